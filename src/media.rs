//! Product image asset paths and public URLs. The bytes live in an external asset store;
//! this crate only names and addresses them.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

pub const PRODUCT_UPLOAD_DIR: &str = "uploads/products";

/// Lowercase ASCII slug: NFKD-decomposed with non-ASCII dropped, anything but word
/// characters, whitespace and hyphens removed, runs of whitespace/hyphens collapsed to a
/// single hyphen, leading/trailing `-` and `_` trimmed.
pub fn slugify(value: &str) -> String {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    static COLLAPSE: OnceLock<Regex> = OnceLock::new();
    let strip = STRIP.get_or_init(|| Regex::new(r"[^\w\s-]").expect("static regex"));
    let collapse = COLLAPSE.get_or_init(|| Regex::new(r"[-\s]+").expect("static regex"));

    let ascii: String = value.nfkd().filter(char::is_ascii).collect::<String>().to_lowercase();
    let stripped = strip.replace_all(&ascii, "");
    let collapsed = collapse.replace_all(stripped.trim(), "-");
    collapsed.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// `uploads/products/<slug-of-name>--<uuid4><.ext>`; the original extension is kept as-is.
pub fn product_image_path(name_of_product: Option<&str>, filename: &str) -> String {
    let slug = slugify(name_of_product.unwrap_or("none"));
    let suffix = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    format!("{}/{}--{}{}", PRODUCT_UPLOAD_DIR, slug, uuid::Uuid::new_v4(), suffix)
}

/// Public URL of a stored asset. A relative media URL is made absolute against `origin`
/// (e.g. `http://shop.test`) when one is known.
pub fn media_url(media_base: &str, origin: Option<&str>, path: &str) -> String {
    let joined = format!(
        "{}/{}",
        media_base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    match origin {
        Some(origin) if joined.starts_with('/') => {
            format!("{}{}", origin.trim_end_matches('/'), joined)
        }
        _ => joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_matches_catalog_conventions() {
        assert_eq!(slugify("Château Margaux 2015"), "chateau-margaux-2015");
        assert_eq!(slugify("  Rosé -- Brut!  "), "rose-brut");
        assert_eq!(slugify("_wine_glass_"), "wine_glass");
        assert_eq!(slugify("日本酒"), "");
    }

    #[test]
    fn slugify_decomposes_central_european_letters() {
        assert_eq!(slugify("Mělník Ryzlink"), "melnik-ryzlink");
        assert_eq!(slugify("Żubrówka"), "zubrowka");
        assert_eq!(slugify("Smederevka Šumadija"), "smederevka-sumadija");
        assert_eq!(slugify("Cœur ﬁn"), "cur-fin");
    }

    #[test]
    fn image_path_keeps_extension_and_is_unique() {
        let a = product_image_path(Some("Pinot Noir"), "bottle.JPG");
        let b = product_image_path(Some("Pinot Noir"), "bottle.JPG");
        assert!(a.starts_with("uploads/products/pinot-noir--"));
        assert!(a.ends_with(".JPG"));
        assert_ne!(a, b);

        let uuid_part = a
            .trim_start_matches("uploads/products/pinot-noir--")
            .trim_end_matches(".JPG");
        assert!(uuid::Uuid::parse_str(uuid_part).is_ok());

        let bare = product_image_path(None, "noext");
        assert!(bare.starts_with("uploads/products/none--"));
        assert!(!bare.contains('.'));
    }

    #[test]
    fn media_urls() {
        assert_eq!(
            media_url("/media/", Some("http://shop.test"), "uploads/products/a.png"),
            "http://shop.test/media/uploads/products/a.png"
        );
        assert_eq!(media_url("/media", None, "a.png"), "/media/a.png");
        assert_eq!(
            media_url("https://cdn.test/m/", Some("http://shop.test"), "a.png"),
            "https://cdn.test/m/a.png"
        );
    }
}
