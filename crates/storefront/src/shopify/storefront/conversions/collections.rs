//! Collection type conversion functions.

use impact_core::pagination::Connection;
use impact_core::types::CollectionId;

use crate::shopify::types::{Collection, CollectionSummary};

use super::super::queries::collection::CollectionData;
use super::super::queries::fragments::{CollectionFields, ConnectionFields};
use super::products::convert_product_item;

pub fn convert_collection_summary(collection: CollectionFields) -> CollectionSummary {
    CollectionSummary {
        id: CollectionId::new(collection.id),
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        image: collection.image,
    }
}

pub fn convert_collection_connection(
    connection: ConnectionFields<CollectionFields>,
) -> Connection<CollectionSummary> {
    Connection {
        nodes: connection
            .nodes
            .into_iter()
            .map(convert_collection_summary)
            .collect(),
        page_info: connection.page_info,
    }
}

pub fn convert_collection(collection: CollectionData) -> Collection {
    Collection {
        id: CollectionId::new(collection.id),
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        products: Connection {
            nodes: collection
                .products
                .nodes
                .into_iter()
                .map(convert_product_item)
                .collect(),
            page_info: collection.products.page_info,
        },
    }
}
