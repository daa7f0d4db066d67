//! Thin helpers over the native netcdf library.
//!
//! The netcdf library needs a real file path (it wraps libnetcdf/HDF5, which
//! hold OS file handles), so every open here is a scarce resource that lives
//! until the returned `netcdf::File` is dropped.

use std::path::Path;
use std::sync::Once;

use crate::error::{NetCdfError, NetCdfResult};

/// Turn off HDF5's automatic error stack printing.
///
/// Probing for optional attributes makes libhdf5 print `HDF5-DIAG` traces to
/// stderr even though the lookup failure is expected. Idempotent; every open
/// below calls it.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: null func/client_data is the documented way to disable
        // automatic printing for the default error stack.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Open a NetCDF file for reading.
pub fn open_file(path: &Path) -> NetCdfResult<netcdf::File> {
    silence_hdf5_errors();

    netcdf::open(path).map_err(|e| NetCdfError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Attribute presence by name, without triggering a failed HDF5 lookup.
pub(crate) fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Numeric attribute as f64, whatever its stored type.
pub(crate) fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    match attr_value {
        netcdf::AttributeValue::Double(d) => Some(d),
        netcdf::AttributeValue::Float(f) => Some(f as f64),
        netcdf::AttributeValue::Int(i) => Some(i as f64),
        netcdf::AttributeValue::Short(s) => Some(s as f64),
        netcdf::AttributeValue::Schar(c) => Some(c as f64),
        netcdf::AttributeValue::Uchar(c) => Some(c as f64),
        netcdf::AttributeValue::Ushort(s) => Some(s as f64),
        netcdf::AttributeValue::Uint(i) => Some(i as f64),
        netcdf::AttributeValue::Longlong(i) => Some(i as f64),
        netcdf::AttributeValue::Ulonglong(i) => Some(i as f64),
        _ => None,
    }
}

/// String attribute, if present and textual.
pub(crate) fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
