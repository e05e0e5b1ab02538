//! Coins

use crate::core::pipeline::Searchable;
use crate::core::specification::Specification;
use uuid::Uuid;

crate::impl_entity!(Coin, "coin", "coins", {
    collection_id: Uuid,
    coin_type: String,
    country: String,
    value: f64,
    year: Option<i32>,
    metal: Option<String>,
});

crate::impl_resource!(CoinDto, "coins", {
    "Id" => id: Uuid,
    "Type" => coin_type: String,
    "Country" => country: String,
    "Value" => value: f64,
    "Year" => year: Option<i32>,
});

impl Coin {
    pub fn new(
        collection_id: Uuid,
        coin_type: impl Into<String>,
        country: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            collection_id,
            coin_type: coin_type.into(),
            country: country.into(),
            value,
            year: None,
            metal: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_metal(mut self, metal: impl Into<String>) -> Self {
        self.metal = Some(metal.into());
        self
    }
}

impl From<&Coin> for CoinDto {
    fn from(coin: &Coin) -> Self {
        Self {
            id: coin.id,
            coin_type: coin.coin_type.clone(),
            country: coin.country.clone(),
            value: coin.value,
            year: coin.year,
        }
    }
}

impl Searchable for Coin {
    fn search_specification(term: &str) -> Specification<Self> {
        Specification::any_contains(["coin_type", "country", "value"], term).named("coin_search")
    }
}

/// Named specifications over coins
pub struct CoinSpecs;

impl CoinSpecs {
    pub fn in_collection(collection_id: Uuid) -> Specification<Coin> {
        Specification::equals("collection_id", collection_id).named("coin_in_collection")
    }

    pub fn from_country(country: &str) -> Specification<Coin> {
        Specification::equals("country", country).named("coin_from_country")
    }

    pub fn by_id(id: Uuid) -> Specification<Coin> {
        Specification::equals("id", id).named("coin_by_id")
    }
}
