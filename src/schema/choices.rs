//! Choice enumerations. Each maps to a PostgreSQL enum type of the same name and
//! serializes to its stored value.

use serde::{Deserialize, Serialize};

/// Declares a choice enum: `Variant => "stored value", "Display label"`.
macro_rules! choices {
    (
        $(#[$meta:meta])*
        $name:ident : $pg:tt, default $default:ident {
            $($variant:ident => $value:tt, $label:tt;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
        #[sqlx(type_name = $pg)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                #[sqlx(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const PG_TYPE: &'static str = $pg;
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            /// Human-readable label used in back-office renderings.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choices! {
    /// Discriminator of a product's variant extension.
    ProductKind: "product_kind", default Wine {
        Wine => "wine", "Wine";
        Glass => "glass", "Glass";
        Corkscrew => "corkscrew", "Corkscrew";
    }
}

choices! {
    WineColor: "wine_color", default Red {
        Red => "red", "Red";
        White => "white", "White";
        Rose => "rose", "Rose";
    }
}

choices! {
    MoodType: "mood_type", default Festive {
        Romantic => "romantic", "Romantic";
        Festive => "festive", "Festive";
        Casual => "casual", "Casual";
    }
}

choices! {
    PriceRange: "price_range", default Budget {
        Budget => "budget", "Budget";
        MidRange => "mid-range", "Mid Range";
        Premium => "premium", "Premium";
    }
}

choices! {
    GlassMaterial: "glass_material", default Glass {
        Glass => "glass", "Glass";
        Crystal => "crystal", "Crystal";
        Plastic => "plastic", "Plastic";
    }
}

choices! {
    CorkscrewMaterial: "corkscrew_material", default StainlessSteel {
        Wood => "wood", "Wood";
        StainlessSteel => "stainless steel", "Stainless";
        Steel => "steel", "Steel";
    }
}

choices! {
    WineType: "wine_type", default Dessert {
        Dry => "dry", "Dry";
        SemiDry => "semi_dry", "Semi Dry";
        SemiSweet => "semi_sweet", "Semi Sweet";
        Dessert => "dessert", "Dessert";
        Sparkling => "sparkling", "Sparkling";
    }
}

/// Every choice type with its allowed values, in creation order.
pub const ALL_CHOICES: &[(&str, &[&str])] = &[
    (ProductKind::PG_TYPE, ProductKind::VALUES),
    (WineColor::PG_TYPE, WineColor::VALUES),
    (MoodType::PG_TYPE, MoodType::VALUES),
    (PriceRange::PG_TYPE, PriceRange::VALUES),
    (GlassMaterial::PG_TYPE, GlassMaterial::VALUES),
    (CorkscrewMaterial::PG_TYPE, CorkscrewMaterial::VALUES),
    (WineType::PG_TYPE, WineType::VALUES),
];
