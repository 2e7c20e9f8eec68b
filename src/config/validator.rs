//! Fixture validation: key uniqueness, referential integrity and variant/type agreement.

use crate::config::{CatalogFixture, VariantFixture};
use crate::error::ConfigError;
use crate::schema::MoodType;
use rust_decimal::Decimal;
use std::collections::HashSet;

pub fn validate(fixture: &CatalogFixture) -> Result<(), ConfigError> {
    let mut countries = HashSet::new();
    for c in &fixture.countries {
        if !countries.insert(c.key.as_str()) {
            return Err(ConfigError::DuplicateKey {
                kind: "country",
                key: c.key.clone(),
            });
        }
    }

    let mut producers = HashSet::new();
    for p in &fixture.producers {
        if !producers.insert(p.key.as_str()) {
            return Err(ConfigError::DuplicateKey {
                kind: "producer",
                key: p.key.clone(),
            });
        }
        if !countries.contains(p.country.as_str()) {
            return Err(ConfigError::MissingReference {
                kind: "country",
                key: p.country.clone(),
            });
        }
    }

    let moods: HashSet<MoodType> = fixture.moods.iter().copied().collect();
    if moods.len() != fixture.moods.len() {
        return Err(ConfigError::Validation("moods must not repeat".into()));
    }

    for product in &fixture.products {
        let name = product.display_name();
        let kind = product.variant.kind();
        if let Some(declared) = product.product_type {
            if declared != kind {
                return Err(ConfigError::VariantMismatch {
                    product: name.to_string(),
                    declared: declared.as_str(),
                    variant: kind.as_str(),
                });
            }
        }
        if product.price < Decimal::ZERO {
            return Err(ConfigError::Validation(format!("{}: price must not be negative", name)));
        }
        match &product.variant {
            VariantFixture::Wine {
                country,
                producer,
                moods: wine_moods,
                ..
            } => {
                if !countries.contains(country.as_str()) {
                    return Err(ConfigError::MissingReference {
                        kind: "country",
                        key: country.clone(),
                    });
                }
                if !producers.contains(producer.as_str()) {
                    return Err(ConfigError::MissingReference {
                        kind: "producer",
                        key: producer.clone(),
                    });
                }
                if let Some(mood) = wine_moods.iter().find(|m| !moods.contains(m)) {
                    return Err(ConfigError::MissingReference {
                        kind: "mood",
                        key: mood.as_str().to_string(),
                    });
                }
            }
            VariantFixture::Glass { country, .. } => {
                if !countries.contains(country.as_str()) {
                    return Err(ConfigError::MissingReference {
                        kind: "country",
                        key: country.clone(),
                    });
                }
            }
            VariantFixture::Corkscrew { .. } => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(products: &str) -> CatalogFixture {
        CatalogFixture::from_json(&format!(
            r#"{{
                "countries": [{{"key": "it", "name": "Italy"}}],
                "producers": [{{"key": "chianti", "country": "it"}}],
                "moods": ["festive"],
                "products": {}
            }}"#,
            products
        ))
        .unwrap()
    }

    #[test]
    fn accepts_consistent_catalog() {
        let f = fixture(
            r#"[{"product_type": "wine",
                 "variant": {"kind": "wine", "country": "it", "producer": "chianti", "moods": ["festive"]}},
                {"variant": {"kind": "glass", "country": "it"}}]"#,
        );
        validate(&f).unwrap();
    }

    #[test]
    fn declared_type_must_match_variant() {
        let f = fixture(
            r#"[{"name_of_product": "Flute", "product_type": "wine",
                 "variant": {"kind": "glass", "country": "it"}}]"#,
        );
        match validate(&f).unwrap_err() {
            ConfigError::VariantMismatch { product, declared, variant } => {
                assert_eq!(product, "Flute");
                assert_eq!(declared, "wine");
                assert_eq!(variant, "glass");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_references_are_reported() {
        let f = fixture(r#"[{"variant": {"kind": "wine", "country": "it", "producer": "barolo"}}]"#);
        assert!(matches!(
            validate(&f),
            Err(ConfigError::MissingReference { kind: "producer", .. })
        ));

        let f = fixture(
            r#"[{"variant": {"kind": "wine", "country": "it", "producer": "chianti", "moods": ["romantic"]}}]"#,
        );
        assert!(matches!(validate(&f), Err(ConfigError::MissingReference { kind: "mood", .. })));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut f = fixture("[]");
        f.countries.push(f.countries[0].clone());
        assert!(matches!(validate(&f), Err(ConfigError::DuplicateKey { kind: "country", .. })));
    }
}
