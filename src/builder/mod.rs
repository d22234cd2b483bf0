//! Инкрементальное построение графов программы.
//!
//! ```rust,ignore
//! use prograph::builder::ClassGraphBuilder;
//! use prograph::nodecodes::SyntaxKind;
//!
//! let mut class = ClassGraphBuilder::new("Foo");
//! let mut m = class.open_method("Foo.m1/0");
//! m.descend(SyntaxKind::ReturnStatement);
//! m.emit_plain("return");
//! m.ascend()?;
//! let method = m.close()?;
//! class.add_method(method);
//! let graph = class.build();
//! ```

pub mod class;
pub mod method;

pub use class::ClassGraphBuilder;
pub use method::MethodCursor;
