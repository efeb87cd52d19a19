//! Runtime message resolution.
//!
//! An [`Intl`] context owns the translation corpus (via a shared
//! [`TemplateStore`]) and formats messages on request:
//!
//! 1. **Lookup**: exact-match template for an id in a locale
//! 2. **Substitution**: `{name}` placeholders and `{@'id'}` nested references
//! 3. **Formatting**: ICU-style plural/select/number step, best effort
//!
//! [`extract_variables`] runs the substitution backwards.
//!
//! ## Module Structure
//!
//! - `context`: The `Intl` formatting context
//! - `icu`: `MessageFormatter` trait and the built-in ICU-style formatter
//! - `inverse`: Variable recovery from formatted text
//! - `store`: Template store and locale file loading
//! - `substitute`: Placeholder substitution and nested references
//! - `types`: Descriptors, values and dictionary aliases

mod context;
mod icu;
mod inverse;
mod store;
mod substitute;
mod types;

pub use context::{DEFAULT_LANGUAGE, Intl, LANGUAGE_NAME_ID};
pub use icu::{
    FormatError, IcuFormatter, MessageFormatter, PluralCategory, format_number, plural_category,
};
pub use inverse::extract_variables;
pub use store::{TemplateStore, load_locales};
pub use substitute::MAX_NESTING_DEPTH;
pub use types::{
    FormatOptions, LanguageListItem, LocaleConfig, MessageDescriptor, MessageDictionary,
    MessageValue, MessageVariables,
};
