//! Sort-key mappings for the catalog resources

use super::{Banknote, BanknoteDto, Coin, CoinDto, Collection, CollectionDto};
use crate::core::error::ConfigError;
use crate::core::mapping::{PropertyMappingEntry, PropertyMappingTable};

/// Build the mapping table for coins, banknotes and collections
///
/// `Owner` sorts by last then first name. `OwnerAge` sorts by date of birth
/// with the direction inverted, so `OwnerAge asc` puts the youngest first.
pub fn catalog_mappings() -> Result<PropertyMappingTable, ConfigError> {
    PropertyMappingTable::builder()
        .register::<CoinDto, Coin, _, _>([
            ("Id", PropertyMappingEntry::new(["id"])),
            ("Type", PropertyMappingEntry::new(["coin_type"])),
            ("Country", PropertyMappingEntry::new(["country"])),
            ("Value", PropertyMappingEntry::new(["value"])),
            ("Year", PropertyMappingEntry::new(["year"])),
        ])
        .register::<BanknoteDto, Banknote, _, _>([
            ("Id", PropertyMappingEntry::new(["id"])),
            ("Type", PropertyMappingEntry::new(["banknote_type"])),
            ("Country", PropertyMappingEntry::new(["country"])),
            ("Value", PropertyMappingEntry::new(["value"])),
            ("Year", PropertyMappingEntry::new(["year"])),
            ("SerialNumber", PropertyMappingEntry::new(["serial_number"])),
        ])
        .register::<CollectionDto, Collection, _, _>([
            ("Id", PropertyMappingEntry::new(["id"])),
            ("Name", PropertyMappingEntry::new(["name"])),
            ("Description", PropertyMappingEntry::new(["description"])),
            (
                "Owner",
                PropertyMappingEntry::new(["owner_last_name", "owner_first_name"]),
            ),
            (
                "OwnerAge",
                PropertyMappingEntry::reverted(["owner_date_of_birth"]),
            ),
        ])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapping::SortKey;

    #[test]
    fn test_catalog_mappings_build() {
        let table = catalog_mappings().unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.has_mapping::<CoinDto, Coin>());
        assert!(!table.has_mapping::<CoinDto, Banknote>());
    }

    #[test]
    fn test_owner_sorts_by_last_then_first_name() {
        let table = catalog_mappings().unwrap();
        let keys = table
            .resolve::<CollectionDto, Collection>(Some("owner desc"))
            .unwrap();
        assert_eq!(
            keys,
            vec![
                SortKey::desc("owner_last_name"),
                SortKey::desc("owner_first_name")
            ]
        );
    }

    #[test]
    fn test_owner_age_is_reverted() {
        let table = catalog_mappings().unwrap();
        let keys = table
            .resolve::<CollectionDto, Collection>(Some("OwnerAge"))
            .unwrap();
        assert_eq!(keys, vec![SortKey::desc("owner_date_of_birth")]);
    }

    #[test]
    fn test_every_dto_field_is_sortable() {
        let table = catalog_mappings().unwrap();
        assert!(table.valid_mapping_exists_for::<CoinDto, Coin>(Some("Id,Type,Country,Value,Year")));
        assert!(table.valid_mapping_exists_for::<BanknoteDto, Banknote>(Some("SerialNumber desc")));
        assert!(!table.valid_mapping_exists_for::<CoinDto, Coin>(Some("Metal")));
    }
}
