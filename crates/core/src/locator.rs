//! Attachment locators: public URLs that encode a store-relative path.
//!
//! A locator has the shape
//! `{public_base}/storage/v1/object/public/{bucket}/{folder}/{filename}`.
//! The bucket sits at a fixed segment offset, and everything after it is
//! the store path. Rendering and parsing both go through [`LocatorFormat`]
//! so producers and consumers agree on that offset.

use url::Url;

use crate::error::CoreError;

/// Path segments between the public base and the bucket name.
pub const PUBLIC_OBJECT_PREFIX: &[&str] = &["storage", "v1", "object", "public"];

/// Default bucket holding every image attachment.
pub const DEFAULT_BUCKET: &str = "images";

/// Renders and parses attachment locators for one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorFormat {
    base: Url,
    bucket: String,
    /// Segments that precede the store path: base path + prefix + bucket.
    prefix: Vec<String>,
}

impl LocatorFormat {
    /// Build a format from the public base URL and bucket name.
    pub fn new(public_base: &str, bucket: &str) -> Result<Self, CoreError> {
        let base = Url::parse(public_base).map_err(|e| {
            CoreError::InvalidInput(format!("invalid public base url '{public_base}': {e}"))
        })?;
        if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
            return Err(CoreError::InvalidInput(format!(
                "public base url '{public_base}' must be an absolute http(s) url"
            )));
        }
        validate_segment(bucket)
            .map_err(|_| CoreError::InvalidInput(format!("invalid bucket name '{bucket}'")))?;

        let mut prefix: Vec<String> = base
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        prefix.extend(PUBLIC_OBJECT_PREFIX.iter().map(|s| s.to_string()));
        prefix.push(bucket.to_string());

        Ok(Self {
            base,
            bucket: bucket.to_string(),
            prefix,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Render the public locator for a store-relative `path`.
    pub fn render(&self, path: &str) -> String {
        let origin = self.base.origin().ascii_serialization();
        format!("{origin}/{}/{}", self.prefix.join("/"), path.trim_start_matches('/'))
    }

    /// Parse a locator back into its store-relative path.
    ///
    /// Rejects anything that does not point inside this bucket on this
    /// host, so a malformed ref can never select the wrong object.
    pub fn parse(&self, locator: &str) -> Result<String, CoreError> {
        let url = Url::parse(locator)
            .map_err(|e| CoreError::InvalidLocator(format!("'{locator}' is not a url: {e}")))?;

        if url.origin() != self.base.origin() {
            return Err(CoreError::InvalidLocator(format!(
                "'{locator}' does not belong to {}",
                self.base.origin().ascii_serialization()
            )));
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.collect())
            .unwrap_or_default();

        if segments.len() < self.prefix.len() + 2 {
            return Err(CoreError::InvalidLocator(format!(
                "'{locator}' has no folder/filename after the bucket"
            )));
        }

        let (head, tail) = segments.split_at(self.prefix.len());
        if head.iter().zip(&self.prefix).any(|(got, want)| *got != want) {
            return Err(CoreError::InvalidLocator(format!(
                "'{locator}' is not under bucket '{}'",
                self.bucket
            )));
        }

        for segment in tail {
            validate_segment(segment).map_err(|reason| {
                CoreError::InvalidLocator(format!("'{locator}' has an invalid path segment: {reason}"))
            })?;
        }

        Ok(tail.join("/"))
    }
}

/// Validate a folder name used for new attachments.
pub fn validate_folder(folder: &str) -> Result<(), CoreError> {
    folder
        .split('/')
        .try_for_each(validate_segment)
        .map_err(|reason| CoreError::InvalidInput(format!("invalid folder '{folder}': {reason}")))
}

fn validate_segment(segment: &str) -> Result<(), &'static str> {
    if segment.is_empty() {
        return Err("empty segment");
    }
    if segment == "." || segment == ".." {
        return Err("relative segment");
    }
    if !segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err("unsupported characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn format() -> LocatorFormat {
        LocatorFormat::new("https://xyz.supabase.co", "images").unwrap()
    }

    #[test]
    fn renders_supabase_style_public_url() {
        assert_eq!(
            format().render("achievements/abc.png"),
            "https://xyz.supabase.co/storage/v1/object/public/images/achievements/abc.png"
        );
    }

    #[test]
    fn parses_path_after_bucket() {
        let path = format()
            .parse("https://xyz.supabase.co/storage/v1/object/public/images/folder/existing.png")
            .unwrap();
        assert_eq!(path, "folder/existing.png");
    }

    #[test]
    fn round_trip_recovers_path() {
        let fmt = format();
        for path in [
            "members/0b7e1b3c-6a4f-4a8e-9d0e-2f7c1e9a0c11.jpeg",
            "projects/5f0c2d4e-1111-4b22-8c33-9d44e55f6677.webp",
        ] {
            assert_eq!(fmt.parse(&fmt.render(path)).unwrap(), path);
        }
    }

    #[test]
    fn base_with_path_prefix_shifts_the_offset() {
        let fmt = LocatorFormat::new("http://localhost:3000/files", "images").unwrap();
        let url = fmt.render("members/a.png");
        assert_eq!(
            url,
            "http://localhost:3000/files/storage/v1/object/public/images/members/a.png"
        );
        assert_eq!(fmt.parse(&url).unwrap(), "members/a.png");
    }

    #[test]
    fn rejects_garbage() {
        assert_matches!(format().parse("not a url"), Err(CoreError::InvalidLocator(_)));
    }

    #[test]
    fn rejects_other_host() {
        assert_matches!(
            format().parse("https://evil.example/storage/v1/object/public/images/a/b.png"),
            Err(CoreError::InvalidLocator(_))
        );
    }

    #[test]
    fn rejects_wrong_bucket() {
        assert_matches!(
            format().parse("https://xyz.supabase.co/storage/v1/object/public/videos/a/b.png"),
            Err(CoreError::InvalidLocator(_))
        );
    }

    #[test]
    fn rejects_missing_folder() {
        assert_matches!(
            format().parse("https://xyz.supabase.co/storage/v1/object/public/images/b.png"),
            Err(CoreError::InvalidLocator(_))
        );
        assert_matches!(
            format().parse("https://xyz.supabase.co/storage/v1/object/public/images/"),
            Err(CoreError::InvalidLocator(_))
        );
    }

    #[test]
    fn rejects_empty_segments() {
        assert_matches!(
            format().parse("https://xyz.supabase.co/storage/v1/object/public/images/a//b.png"),
            Err(CoreError::InvalidLocator(_))
        );
    }

    #[test]
    fn folder_validation() {
        assert!(validate_folder("members").is_ok());
        assert!(validate_folder("club/members").is_ok());
        assert!(validate_folder("").is_err());
        assert!(validate_folder("../etc").is_err());
        assert!(validate_folder("a b").is_err());
    }
}
