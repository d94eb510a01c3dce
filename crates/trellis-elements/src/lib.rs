//! Custom element renderers for prerendering design-system markup.
//!
//! Each element reads the attributes and content written on its tag and produces
//! replacement markup. The registry finds registered tags in an HTML document and
//! overwrites their contents, the same way the browser-side elements overwrite
//! their own `innerHTML` when attached.

pub mod button;
pub mod markup;
pub mod navbar;
pub mod registry;
pub mod scaffold;
pub mod template;
pub mod traits;

pub use button::{ButtonConfig, ExampleButton};
pub use markup::{find_elements, text_content, ElementMatch};
pub use navbar::{NavbarComponent, NavbarConfig};
pub use registry::{ElementRegistry, Expansion};
pub use scaffold::{component_script, is_valid_tag_name, ScaffoldError};
pub use template::{TemplateConfig, TemplateElement};
pub use traits::{Attributes, CustomElement};
