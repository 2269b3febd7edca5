pub mod chunker;
pub mod extract;

pub use chunker::{chunk_text, into_sections, TextChunk};
pub use extract::{
    DocumentExtractor, DocumentKind, ExtractionError, PdfExtractor, PlainTextExtractor,
    TextExtractor,
};
