//! Schema ids for the press release space
//!
//! Attributes, relation types, and well-known entities that already exist
//! in the target space. These ids are data, not code: repointing one
//! redirects every subsequent edit.

/// Space the press releases are published into unless `SPACE_ID` says
/// otherwise.
pub const DEFAULT_SPACE_ID: &str = "NCdYgAuRjEYgsRrzQ5W4NC";

/// Id table for the press release schema.
///
/// `Default` carries the ids of the deployed schema. The "Properties"
/// entity doubles as the relation type of the same name, so one field
/// covers both roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressReleaseSchema {
    /// Name (TEXT)
    pub name_attr: &'static str,
    /// Publish date (TIME)
    pub publish_date_attr: &'static str,
    /// Web URL (URL)
    pub web_url_attr: &'static str,
    /// Description (TEXT)
    pub description_attr: &'static str,
    /// Blocks (relation to content block entities)
    pub blocks_attr: &'static str,
    /// Publisher (relation)
    pub publisher_attr: &'static str,
    /// The universal "Types" relation
    pub types_relation: &'static str,
    /// "Press release" type entity
    pub press_release_type: &'static str,
    /// "Chainwire" publisher entity
    pub chainwire_publisher: &'static str,
    /// "Properties" relation and entity
    pub properties_relation: &'static str,
    /// "Property" type entity
    pub property_type: &'static str,
    /// "Type" type entity
    pub type_entity: &'static str,
}

impl Default for PressReleaseSchema {
    fn default() -> Self {
        Self {
            name_attr: "LuBWqZAu6pz54eiJS5mLv8",
            publish_date_attr: "KPNjGaLx5dKofVhT6Dfw22",
            web_url_attr: "93stf6cgYvBsdPruRzq1KK",
            description_attr: "LA1DqP5v6QAdsgLPXGF3YA",
            blocks_attr: "QYbjCM6NT9xmh2hFGsqpQX",
            publisher_attr: "Lc4JrkpMUPhNstqs7mvnc5",
            types_relation: "Jfmby78N4BCseZinBmdVov",
            press_release_type: "RZauYFG6886WwWHiq6y5JM",
            chainwire_publisher: "6RrWbaDFvzrynhMyqZz4Gf",
            properties_relation: "9zBADaYzyfzyFJn4GU1cC",
            property_type: "GscJ2GELQjmLoaVrYyR3xm",
            type_entity: "VdTsW1mGiy1XSooJaBBLc4",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphwire_kg::ids;

    #[test]
    fn test_schema_ids_are_well_formed() {
        let schema = PressReleaseSchema::default();
        let ids = [
            schema.name_attr,
            schema.publish_date_attr,
            schema.web_url_attr,
            schema.description_attr,
            schema.blocks_attr,
            schema.publisher_attr,
            schema.types_relation,
            schema.press_release_type,
            schema.chainwire_publisher,
            schema.properties_relation,
            schema.property_type,
            schema.type_entity,
        ];
        for id in ids {
            assert!(ids::is_well_formed(id), "malformed schema id: {id}");
        }
        assert!(ids::is_well_formed(DEFAULT_SPACE_ID));
    }
}
