//! Marketplace enums: sale channels and Shopee fee categories.

use serde::{Deserialize, Serialize};

/// External marketplace an online transaction was placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleChannel {
    Shopee,
    Lazada,
    Tokopedia,
    Tiktok,
}

impl SaleChannel {
    /// Every channel, in the order they are offered to the user.
    pub const ALL: [Self; 4] = [Self::Shopee, Self::Lazada, Self::Tokopedia, Self::Tiktok];

    /// Wire representation (`SHOPEE`, `LAZADA`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shopee => "SHOPEE",
            Self::Lazada => "LAZADA",
            Self::Tokopedia => "TOKOPEDIA",
            Self::Tiktok => "TIKTOK",
        }
    }
}

impl std::fmt::Display for SaleChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for SaleChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SHOPEE" => Ok(Self::Shopee),
            "LAZADA" => Ok(Self::Lazada),
            "TOKOPEDIA" => Ok(Self::Tokopedia),
            "TIKTOK" => Ok(Self::Tiktok),
            _ => Err(format!("invalid sale channel: {s}")),
        }
    }
}

/// Shopee fee category of a product.
///
/// The backend derives the Shopee sale price from the category's fee
/// schedule; the client only carries the letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShopeeCategory {
    #[default]
    A,
    B,
    C,
    D,
    E,
}

impl ShopeeCategory {
    pub const ALL: [Self; 5] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }
}

impl std::fmt::Display for ShopeeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for ShopeeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "E" => Ok(Self::E),
            _ => Err(format!("invalid shopee category: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_channel_wire_format() {
        let json = serde_json::to_string(&SaleChannel::Tokopedia).unwrap();
        assert_eq!(json, "\"TOKOPEDIA\"");
        assert_eq!(
            serde_json::from_str::<SaleChannel>("\"TIKTOK\"").unwrap(),
            SaleChannel::Tiktok
        );
    }

    #[test]
    fn test_sale_channel_from_str_is_case_insensitive() {
        assert_eq!("shopee".parse::<SaleChannel>(), Ok(SaleChannel::Shopee));
        assert!("bukalapak".parse::<SaleChannel>().is_err());
    }

    #[test]
    fn test_display_matches_wire_format() {
        for channel in SaleChannel::ALL {
            let json = serde_json::to_string(&channel).unwrap();
            assert_eq!(json, format!("\"{channel}\""));
        }
    }

    #[test]
    fn test_shopee_category_parse() {
        assert_eq!("c".parse::<ShopeeCategory>(), Ok(ShopeeCategory::C));
        assert!("F".parse::<ShopeeCategory>().is_err());
    }
}
