//! Value types carried by H.245 PER-encoded messages

pub mod octet_string;
pub mod bit_string;
pub mod char_string;
pub mod object_ident;

// Re-export types
pub use octet_string::OctetString;
pub use bit_string::BitString;
pub use char_string::CharString;
pub use object_ident::ObjectIdent;
