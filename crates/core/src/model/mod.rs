pub mod event;
pub mod level;
pub mod record;
pub mod value;

pub use event::{ExceptionInfo, LogEvent, SOURCE_CONTEXT_PROPERTY};
pub use level::Level;
pub use record::{Attribute, AttributeList, ConvertedValue, OutputRecord, Severity};
pub use value::{Properties, PropertyValue, Scalar, StructureValue};
