//! Encoding of response payloads

use crate::FunctionResult;

/// A payload which can be converted to a vector of bytes
pub trait Payload {
    /// Convert the payload to a vector of bytes
    fn try_serialize(self) -> FunctionResult<Vec<u8>>;
}

impl Payload for Vec<u8> {
    fn try_serialize(self) -> FunctionResult<Vec<u8>> {
        Ok(self)
    }
}
impl Payload for &[u8] {
    fn try_serialize(self) -> FunctionResult<Vec<u8>> {
        Ok(self.to_vec())
    }
}
impl Payload for String {
    fn try_serialize(self) -> FunctionResult<Vec<u8>> {
        Ok(self.into_bytes())
    }
}
impl Payload for &str {
    fn try_serialize(self) -> FunctionResult<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }
}
impl Payload for () {
    fn try_serialize(self) -> FunctionResult<Vec<u8>> {
        Ok(Vec::new())
    }
}
impl Payload for serde_json::Value {
    fn try_serialize(self) -> FunctionResult<Vec<u8>> {
        serde_json::to_vec(&self).map_err(crate::Error::Encoding)
    }
}

/// JSON encoding
pub struct Json<T>(pub T);
impl<T: serde::Serialize> Payload for Json<T> {
    fn try_serialize(self) -> FunctionResult<Vec<u8>> {
        serde_json::to_vec(&self.0).map_err(crate::Error::Encoding)
    }
}

/// An HTML document
pub struct Html<T>(pub T);
impl<T: Into<String>> Payload for Html<T> {
    fn try_serialize(self) -> FunctionResult<Vec<u8>> {
        Ok(self.0.into().into_bytes())
    }
}
