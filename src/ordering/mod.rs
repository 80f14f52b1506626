pub mod index_parser;
pub mod sort_key;

pub use index_parser::{parse_index, parse_index_references, parse_index_text, IndexReference};
pub use sort_key::{
    file_name_of, is_index_file, sort_key, sort_paths, DocumentType, SortClass, SortKey,
    DOCUMENT_EXTENSION, INDEX_FILE_NAME,
};
