//! Content type resolution.

use rr_markup::Markup;

use crate::error::CheckError;

/// Pick the markup dialect for a description.
///
/// A missing or empty description is rejected before the content type is
/// looked at. An unset (or blank) content type falls back to
/// [`Markup::LEGACY_DEFAULT`], reStructuredText, for compatibility with
/// metadata written before content types existed.
///
/// # Errors
///
/// Returns [`CheckError::MissingDescription`] or
/// [`CheckError::InvalidContentType`].
pub fn resolve(
    description: Option<&str>,
    content_type: Option<&str>,
) -> Result<Markup, CheckError> {
    if description.is_none_or(str::is_empty) {
        return Err(CheckError::MissingDescription);
    }

    let Some(value) = content_type.filter(|v| !v.trim().is_empty()) else {
        tracing::debug!(
            markup = %Markup::LEGACY_DEFAULT,
            "No content type declared, using legacy default"
        );
        return Ok(Markup::LEGACY_DEFAULT);
    };

    let markup =
        Markup::from_content_type(value).map_err(|reason| CheckError::InvalidContentType {
            value: value.to_owned(),
            reason,
        })?;
    tracing::debug!(content_type = value, %markup, "Resolved content type");
    Ok(markup)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rr_markup::{MarkdownVariant, MarkupError};

    use super::*;

    #[test]
    fn test_unset_defaults_to_rst() {
        assert_eq!(resolve(Some("text"), None), Ok(Markup::ReStructuredText));
        assert_eq!(resolve(Some("text"), Some("  ")), Ok(Markup::ReStructuredText));
    }

    #[test]
    fn test_known_types() {
        assert_eq!(
            resolve(Some("text"), Some("text/x-rst; charset=UTF-8")),
            Ok(Markup::ReStructuredText)
        );
        assert_eq!(
            resolve(Some("text"), Some("text/markdown")),
            Ok(Markup::Markdown(MarkdownVariant::Gfm))
        );
        assert_eq!(
            resolve(Some("text"), Some("text/plain")),
            Ok(Markup::PlainText)
        );
    }

    #[test]
    fn test_missing_wins_over_invalid_type() {
        assert_eq!(
            resolve(None, Some("text/wat")),
            Err(CheckError::MissingDescription)
        );
        assert_eq!(resolve(Some(""), None), Err(CheckError::MissingDescription));
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(
            resolve(Some("text"), Some("text/html")),
            Err(CheckError::InvalidContentType {
                value: "text/html".to_owned(),
                reason: MarkupError::UnknownContentType("text/html".to_owned()),
            })
        );
    }

    #[test]
    fn test_unknown_markdown_variant() {
        let err = resolve(Some("text"), Some("text/markdown; variant=Wiki")).unwrap_err();
        assert!(matches!(
            err,
            CheckError::InvalidContentType {
                reason: MarkupError::UnknownVariant(_),
                ..
            }
        ));
    }
}
