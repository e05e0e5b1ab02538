//! Collections and their owners

use crate::core::pipeline::Searchable;
use crate::core::specification::Specification;
use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

crate::impl_entity!(Collection, "collection", "collections", {
    name: String,
    description: Option<String>,
    owner_first_name: String,
    owner_last_name: String,
    owner_date_of_birth: DateTime<Utc>,
});

crate::impl_resource!(CollectionDto, "collections", {
    "Id" => id: Uuid,
    "Name" => name: String,
    "Description" => description: Option<String>,
    "Owner" => owner: String,
    "OwnerAge" => owner_age: i32,
});

impl Collection {
    pub fn new(
        name: impl Into<String>,
        owner_first_name: impl Into<String>,
        owner_last_name: impl Into<String>,
        owner_date_of_birth: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            owner_first_name: owner_first_name.into(),
            owner_last_name: owner_last_name.into(),
            owner_date_of_birth,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Owner's age in whole years at `today`
    pub fn owner_age_at(&self, today: DateTime<Utc>) -> i32 {
        let born = self.owner_date_of_birth;
        let mut age = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            age -= 1;
        }
        age
    }
}

impl From<&Collection> for CollectionDto {
    fn from(collection: &Collection) -> Self {
        Self {
            id: collection.id,
            name: collection.name.clone(),
            description: collection.description.clone(),
            owner: format!(
                "{} {}",
                collection.owner_first_name, collection.owner_last_name
            ),
            owner_age: collection.owner_age_at(Utc::now()),
        }
    }
}

impl Searchable for Collection {
    fn search_specification(term: &str) -> Specification<Self> {
        Specification::any_contains(["name", "description"], term).named("collection_search")
    }
}

/// Named specifications over collections
pub struct CollectionSpecs;

impl CollectionSpecs {
    pub fn by_name(name: &str) -> Specification<Collection> {
        Specification::equals("name", name).named("collection_by_name")
    }

    pub fn by_id(id: Uuid) -> Specification<Collection> {
        Specification::equals("id", id).named("collection_by_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn born(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_owner_age_counts_whole_years() {
        let collection = Collection::new("Latin America", "Ana", "Ruiz", born(1990, 6, 15));
        assert_eq!(collection.owner_age_at(born(2020, 6, 14)), 29);
        assert_eq!(collection.owner_age_at(born(2020, 6, 15)), 30);
    }

    #[test]
    fn test_dto_joins_owner_name() {
        let collection = Collection::new("Latin America", "Ana", "Ruiz", born(1990, 6, 15));
        let dto = CollectionDto::from(&collection);
        assert_eq!(dto.owner, "Ana Ruiz");
    }

    #[test]
    fn test_by_name_is_normalized() {
        let collection = Collection::new("Latin America", "Ana", "Ruiz", born(1990, 6, 15));
        assert!(CollectionSpecs::by_name("LATIN america ").is_satisfied_by(&collection));
        assert!(CollectionSpecs::by_id(collection.id).is_satisfied_by(&collection));
    }

    #[test]
    fn test_search_covers_description() {
        let collection = Collection::new("Europe", "Ana", "Ruiz", born(1990, 6, 15))
            .with_description("Pre-euro currencies");
        assert!(Collection::search_specification("EURO").is_satisfied_by(&collection));
        assert!(!Collection::search_specification("asia").is_satisfied_by(&collection));
    }
}
