//! NetCDF loading for gridded meteorological data.
//!
//! Files are expected to hold one data variable laid out as
//! `(time, latitude, longitude)` (or a bare `(latitude, longitude)` field),
//! with CF-style coordinate variables. [`GriddedDataset::open`] opens one or
//! many such files as a single logical grid, merged along time.
//!
//! # Implementation Notes
//!
//! Reading goes through the `netcdf` crate (libnetcdf/HDF5). Opening a
//! dataset reads coordinates and attributes only; values are pulled lazily,
//! already restricted to the dataset's spatial window, with `_FillValue`,
//! `missing_value`, `scale_factor` and `add_offset` applied.

pub mod cf;
pub mod dataset;
pub mod error;
pub mod native;

pub use cf::{TimeUnits, ValueDecoding};
pub use dataset::{GriddedDataset, LATITUDE_NAMES, LONGITUDE_NAMES};
pub use error::{NetCdfError, NetCdfResult};
pub use native::silence_hdf5_errors;
