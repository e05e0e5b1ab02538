//! Banknotes

use crate::core::pipeline::Searchable;
use crate::core::specification::Specification;
use uuid::Uuid;

crate::impl_entity!(Banknote, "banknote", "banknotes", {
    collection_id: Uuid,
    banknote_type: String,
    country: String,
    value: f64,
    year: Option<i32>,
    serial_number: Option<String>,
});

crate::impl_resource!(BanknoteDto, "banknotes", {
    "Id" => id: Uuid,
    "Type" => banknote_type: String,
    "Country" => country: String,
    "Value" => value: f64,
    "Year" => year: Option<i32>,
    "SerialNumber" => serial_number: Option<String>,
});

impl Banknote {
    pub fn new(
        collection_id: Uuid,
        banknote_type: impl Into<String>,
        country: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            collection_id,
            banknote_type: banknote_type.into(),
            country: country.into(),
            value,
            year: None,
            serial_number: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }
}

impl From<&Banknote> for BanknoteDto {
    fn from(note: &Banknote) -> Self {
        Self {
            id: note.id,
            banknote_type: note.banknote_type.clone(),
            country: note.country.clone(),
            value: note.value,
            year: note.year,
            serial_number: note.serial_number.clone(),
        }
    }
}

impl Searchable for Banknote {
    fn search_specification(term: &str) -> Specification<Self> {
        Specification::any_contains(["banknote_type", "country"], term).named("banknote_search")
    }
}

/// Named specifications over banknotes
pub struct BanknoteSpecs;

impl BanknoteSpecs {
    pub fn in_collection(collection_id: Uuid) -> Specification<Banknote> {
        Specification::equals("collection_id", collection_id).named("banknote_in_collection")
    }

    pub fn by_serial_number(serial_number: &str) -> Specification<Banknote> {
        Specification::equals("serial_number", serial_number).named("banknote_by_serial")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_ignores_serial_number() {
        let note = Banknote::new(Uuid::nil(), "Dollars", "Canada", 20.0)
            .with_serial_number("AB123");
        assert!(Banknote::search_specification("canada").is_satisfied_by(&note));
        assert!(!Banknote::search_specification("ab123").is_satisfied_by(&note));
    }

    #[test]
    fn test_serial_number_spec_is_normalized() {
        let note = Banknote::new(Uuid::nil(), "Dollars", "Canada", 20.0)
            .with_serial_number("AB123");
        assert!(BanknoteSpecs::by_serial_number(" ab123 ").is_satisfied_by(&note));
        assert!(!BanknoteSpecs::by_serial_number("AB124").is_satisfied_by(&note));
    }
}
