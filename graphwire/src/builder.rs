//! Operation builders for press release edits
//!
//! Turns scraped articles and fixed schema wiring into the op lists the
//! pipeline publishes. Builders are pure: they mint entity ids and shape
//! ops but never touch the network.

use chrono::Utc;
use graphwire_kg::{ids, Op, RelationSpec, Value};

use crate::feed::Article;
use crate::schema::PressReleaseSchema;

/// Ops for one press release, plus the ids minted while building them.
///
/// The ids are what later steps (and the published snapshot) use to refer
/// back to the entity, so they must leave this function together with the
/// ops.
#[derive(Debug, Clone)]
pub struct PressReleaseOps {
    pub entity_id: String,
    pub block_id: String,
    pub ops: Vec<Op>,
}

/// Build the full op list for one scraped article.
///
/// A press release is its own entity plus one content block entity:
/// the types edge marks it a press release, four triples carry the
/// scraped fields, the publisher edge points at Chainwire, and the
/// blocks edge hangs the content block off the entity. An absent or
/// unparseable publish date falls back to the time of ingestion.
pub fn press_release_ops(article: &Article, schema: &PressReleaseSchema) -> PressReleaseOps {
    let entity_id = ids::generate();
    let block_id = ids::generate();

    let publish_date = article.pub_date.unwrap_or_else(Utc::now);
    let content = article.content.as_deref().unwrap_or("No content available");

    let ops = vec![
        Op::create_relation(&RelationSpec::new(
            &entity_id,
            schema.types_relation,
            schema.press_release_type,
        )),
        Op::set_triple(&entity_id, schema.name_attr, Value::text(&article.title)),
        Op::set_triple(
            &entity_id,
            schema.publish_date_attr,
            Value::time(publish_date),
        ),
        Op::set_triple(&entity_id, schema.web_url_attr, Value::url(&article.link)),
        Op::create_relation(&RelationSpec::new(
            &entity_id,
            schema.publisher_attr,
            schema.chainwire_publisher,
        )),
        Op::set_triple(&block_id, schema.description_attr, Value::text(content)),
        Op::create_relation(&RelationSpec::new(
            &entity_id,
            schema.blocks_attr,
            &block_id,
        )),
    ];

    PressReleaseOps {
        entity_id,
        block_id,
        ops,
    }
}

/// The four banner triples written directly onto the space entity
pub fn space_banner_ops(
    space_id: &str,
    title: &str,
    publish_date: chrono::DateTime<Utc>,
    web_url: &str,
    blocks: &str,
    schema: &PressReleaseSchema,
) -> Vec<Op> {
    vec![
        Op::set_triple(space_id, schema.name_attr, Value::text(title)),
        Op::set_triple(space_id, schema.publish_date_attr, Value::time(publish_date)),
        Op::set_triple(space_id, schema.web_url_attr, Value::url(web_url)),
        Op::set_triple(space_id, schema.blocks_attr, Value::text(blocks)),
    ]
}

/// The three schema-wiring edges that make press release properties
/// browsable: the type gains a Properties edge, and the Properties
/// entity is typed as both Property and Type.
///
/// These target fixed entities, so they are exactly the edges the
/// existence checker must guard against duplicating.
pub fn property_links(schema: &PressReleaseSchema) -> Vec<RelationSpec> {
    vec![
        RelationSpec::new(
            schema.press_release_type,
            schema.properties_relation,
            schema.properties_relation,
        ),
        RelationSpec::new(
            schema.properties_relation,
            schema.types_relation,
            schema.property_type,
        ),
        RelationSpec::new(
            schema.properties_relation,
            schema.types_relation,
            schema.type_entity,
        ),
    ]
}
