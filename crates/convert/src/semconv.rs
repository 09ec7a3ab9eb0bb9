//! Attribute keys shared with the telemetry backend.

pub const EXCEPTION_TYPE: &str = "exception.type";
pub const EXCEPTION_MESSAGE: &str = "exception.message";
pub const EXCEPTION_STACKTRACE: &str = "exception.stacktrace";

pub const MESSAGE_TEMPLATE_TEXT: &str = "message_template.text";
pub const MESSAGE_TEMPLATE_MD5_HASH: &str = "message_template.hash.md5";
pub const MESSAGE_TEMPLATE_RENDERINGS: &str = "message_template.renderings";

/// Key under which structure type tags are kept.
pub const TYPE_TAG: &str = "$type";

pub const SERVICE_NAME: &str = "service.name";
