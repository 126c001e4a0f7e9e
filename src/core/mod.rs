//! Core gateway modules

pub mod context;
pub mod format;
pub mod normalize;
pub mod remote;
pub mod service;
pub mod url_extract;
pub mod validator;
pub mod vcs;

// Re-export main types for convenience
pub use context::{parse_bool, RequestContext};
pub use format::{render_document, ConversionError, WireFormat, JSON_CONTENT_TYPE, YAML_CONTENT_TYPE};
pub use normalize::{classify, normalize, FailureClass, ValidationIssue, ValidatorFailure};
pub use remote::{RemoteResolver, ResolveError};
pub use service::*;
pub use url_extract::extract_url;
pub use validator::{BasicValidator, DescriptorValidator, ParserOptions};
pub use vcs::{Platform, PlatformKind, PlatformTable, DEFAULT_BRANCH};
