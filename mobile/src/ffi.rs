//! C surface for host applications.
//!
//! Every entry point null-checks its pointers and maps errors to null,
//! empty, or negative returns; nothing unwinds across the boundary.

use super::AnalyzerHandle;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_float, c_int};
use std::path::PathBuf;

/// One prediction crossing the FFI boundary. The label is an owned C
/// string released by `prediction_array_free`.
#[repr(C)]
pub struct CPrediction {
    pub label: *mut c_char,
    pub confidence: c_float,
}

#[repr(C)]
pub struct PredictionArray {
    pub ptr: *mut CPrediction,
    pub len: usize,
}

impl PredictionArray {
    fn empty() -> Self {
        Self {
            ptr: std::ptr::null_mut(),
            len: 0,
        }
    }
}

fn path_from(ptr: *const c_char) -> Option<PathBuf> {
    if ptr.is_null() {
        return None;
    }
    let cstr = unsafe { CStr::from_ptr(ptr) };
    Some(PathBuf::from(cstr.to_string_lossy().into_owned()))
}

/// Open the analyzer. `labels_path` may be null to probe the candidate
/// label files next to the model. Returns null on any failure.
#[no_mangle]
pub extern "C" fn analyzer_new(
    model_path: *const c_char,
    labels_path: *const c_char,
) -> *mut AnalyzerHandle {
    let Some(model) = path_from(model_path) else {
        return std::ptr::null_mut();
    };
    let labels = path_from(labels_path);
    match AnalyzerHandle::open(&model, labels.as_deref()) {
        Ok(handle) => Box::into_raw(Box::new(handle)),
        Err(_) => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub extern "C" fn analyzer_free(handle: *mut AnalyzerHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

/// Classify a buffer of normalized mono samples. Returns an empty array
/// on null inputs or classification failure.
#[no_mangle]
pub extern "C" fn analyzer_classify(
    handle: *mut AnalyzerHandle,
    samples: *const c_float,
    len: usize,
) -> PredictionArray {
    if handle.is_null() || samples.is_null() {
        return PredictionArray::empty();
    }
    let handle = unsafe { &mut *handle };
    let input = unsafe { std::slice::from_raw_parts(samples, len) };

    let result = match handle.classify(input) {
        Ok(result) => result,
        Err(_) => return PredictionArray::empty(),
    };

    let predictions: Vec<CPrediction> = result
        .predictions()
        .iter()
        .map(|p| CPrediction {
            label: CString::new(p.label.as_str())
                .unwrap_or_default()
                .into_raw(),
            confidence: p.confidence,
        })
        .collect();

    let len = predictions.len();
    let mut slice = predictions.into_boxed_slice();
    let ptr = slice.as_mut_ptr();
    std::mem::forget(slice);
    PredictionArray { ptr, len }
}

#[no_mangle]
pub extern "C" fn prediction_array_free(arr: PredictionArray) {
    if arr.ptr.is_null() {
        return;
    }
    unsafe {
        let predictions = Vec::from_raw_parts(arr.ptr, arr.len, arr.len);
        for prediction in predictions {
            if !prediction.label.is_null() {
                drop(CString::from_raw(prediction.label));
            }
        }
    }
}

/// Run the all-zero load check. Returns the output tensor rank, or a
/// negative value when the handle is null or the pass fails.
#[no_mangle]
pub extern "C" fn analyzer_smoke_test(handle: *mut AnalyzerHandle) -> c_int {
    if handle.is_null() {
        return -1;
    }
    let handle = unsafe { &mut *handle };
    match handle.smoke_test() {
        Ok(shape) => shape.len() as c_int,
        Err(_) => -1,
    }
}
