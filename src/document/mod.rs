//! Document metadata: contracts, waivers, policies and certificates.

mod core;
mod documents_page;
mod endpoints;

pub use core::{
    Document, DocumentId, DocumentListing, DocumentType, NewDocument, create_document,
    create_document_table, delete_document, get_documents,
};
pub use documents_page::get_documents_page;
pub use endpoints::{create_document_endpoint, delete_document_endpoint};
