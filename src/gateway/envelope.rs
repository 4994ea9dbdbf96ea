//! Caller-side ownership of result envelopes
//!
//! An [`Envelope`] adopts the raw result of one boundary call and releases it
//! through the engine's free function when dropped. Decoding copies the text
//! out into owned `String`s first, so nothing borrowed from the native
//! buffers outlives the release.

use super::bindings::FreeResultFn;
use super::error::GatewayError;
use super::operation::Operation;
use crate::ffi::PlanEngineResult;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;

/// Decoded envelope: exactly one side is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Success(String),
    Failure(String),
}

pub struct Envelope {
    raw: PlanEngineResult,
    release: FreeResultFn,
}

impl Envelope {
    /// Take ownership of a raw result
    ///
    /// # Safety
    /// `raw` must have been returned by the engine whose free function is
    /// `release`, and must not have been released or adopted before.
    pub unsafe fn adopt(raw: PlanEngineResult, release: FreeResultFn) -> Self {
        Self { raw, release }
    }

    /// Copy the envelope's text out and release it
    pub fn decode(self, operation: Operation) -> Result<Reply, GatewayError> {
        let success = self.raw.success;
        let payload = unsafe { borrow_text(self.raw.data) }.map(|text| text.to_str().map(str::to_owned));
        let error = unsafe { borrow_text(self.raw.error) }.map(|text| text.to_string_lossy().into_owned());

        // Release point: everything needed has been copied above.
        drop(self);

        if success {
            return match payload {
                Some(Ok(text)) => Ok(Reply::Success(text)),
                Some(Err(e)) => {
                    log::error!("{} returned a payload that is not valid UTF-8: {}", operation, e);
                    Err(GatewayError::Decode {
                        operation,
                        detail: format!("payload is not valid UTF-8: {}", e),
                    })
                }
                None => {
                    log::error!("{} reported success without a payload", operation);
                    Err(GatewayError::Decode {
                        operation,
                        detail: "envelope reported success without a payload".to_string(),
                    })
                }
            };
        }

        let message = match error {
            Some(text) if !text.trim().is_empty() => text,
            _ => format!("unknown error performing {}", operation),
        };
        Ok(Reply::Failure(message))
    }
}

impl Drop for Envelope {
    fn drop(&mut self) {
        let raw = PlanEngineResult {
            success: self.raw.success,
            data: std::mem::replace(&mut self.raw.data, ptr::null_mut()),
            error: std::mem::replace(&mut self.raw.error, ptr::null_mut()),
        };
        unsafe { (self.release)(raw) };
    }
}

unsafe fn borrow_text<'a>(ptr: *const c_char) -> Option<&'a CStr> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr))
    }
}
