//! # codesage
//!
//! Turns the text of a PDF into exam-style questions and answers.
//!
//! The crate has two halves that are glued together by the API server and
//! the CLI:
//!
//! - [`extractor`] reads a PDF from disk and returns its plain text.
//! - [`generator`] sends that text to an OpenAI-compatible chat-completion
//!   endpoint wrapped in a fixed prompt ([`prompt`]) and returns the raw
//!   completion.
//!
//! ## Example
//!
//! ```rust,no_run
//! use codesage::{GeneratorConfig, PdfTextExtractor, QuestionGenerator, TextExtractor};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let text = PdfTextExtractor::new().extract_text("lecture.pdf".as_ref())?;
//!
//! let generator = QuestionGenerator::new(GeneratorConfig::new("sk-or-..."))?;
//! let questions = generator.generate(&text).await?;
//! println!("{questions}");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extractor;
pub mod generator;
pub mod prompt;

pub use error::{ExtractionError, GenerationError};
pub use extractor::{PdfTextExtractor, TextExtractor};
pub use generator::{
    GeneratorConfig, QuestionGenerator, DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT,
    TEMPERATURE,
};
pub use prompt::build_prompt;
