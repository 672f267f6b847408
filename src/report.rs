//! Reporting sinks.
//!
//! A report is a serializable row type bound to a short name with
//! [`define_report!`](crate::define_report). The engine hands finished rows to a [`ReportSink`];
//! what happens to them is up to the sink: [`CsvReportSink`] writes one CSV file per report type
//! and [`MemoryReportSink`] keeps the rows around for inspection.

use std::any::TypeId;
use std::fs::{create_dir_all, File};
use std::path::PathBuf;

use csv::Writer;
use log::trace;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SimError;
use crate::hashing::{HashMap, HashMapExt, IndexMap};

pub trait Report: Serialize + 'static {
    /// Short name of the report, used to build its file name.
    fn name() -> &'static str;
}

/// Use this macro to bind a row type to a report name
#[macro_export]
macro_rules! define_report {
    ($name:ident, $short_name:expr) => {
        impl $crate::report::Report for $name {
            fn name() -> &'static str {
                $short_name
            }
        }
    };
}

pub trait ReportSink {
    /// Accepts one row of report `T`.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` if the row cannot be recorded.
    fn send_report<T: Report>(&mut self, report: &T) -> Result<(), SimError>;

    /// Pushes buffered rows to their destination.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` if the destination cannot be written.
    fn flush(&mut self) -> Result<(), SimError> {
        Ok(())
    }
}

/// Where and how CSV reports are written.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub file_prefix: String,
    pub directory: PathBuf,
    pub overwrite: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            file_prefix: String::new(),
            directory: PathBuf::from("."),
            overwrite: false,
        }
    }
}

impl ReportOptions {
    /// Sets the file prefix option (e.g., "report_")
    pub fn file_prefix(&mut self, file_prefix: String) -> &mut ReportOptions {
        self.file_prefix = file_prefix;
        self
    }

    /// Sets the directory where reports will be output
    pub fn directory(&mut self, directory: PathBuf) -> &mut ReportOptions {
        self.directory = directory;
        self
    }

    /// Sets whether to overwrite existing reports of the same name if they exist
    pub fn overwrite(&mut self, overwrite: bool) -> &mut ReportOptions {
        self.overwrite = overwrite;
        self
    }

    pub fn path_for(&self, short_name: &str) -> PathBuf {
        self.directory
            .join(format!("{}{short_name}.csv", self.file_prefix))
    }
}

/// Writes each report type to `{directory}/{file_prefix}{name}.csv`. Files are created the first
/// time a row of their type arrives.
pub struct CsvReportSink {
    options: ReportOptions,
    file_writers: HashMap<TypeId, Writer<File>>,
}

impl CsvReportSink {
    pub fn new(options: ReportOptions) -> CsvReportSink {
        CsvReportSink {
            options,
            file_writers: HashMap::new(),
        }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Creates the output file for report `T` ahead of its first row.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` if the file already exists and overwriting is disabled, or if the
    /// file or its parent directories cannot be created.
    pub fn add_report<T: Report>(&mut self) -> Result<(), SimError> {
        if self.file_writers.contains_key(&TypeId::of::<T>()) {
            return Err(SimError::ReportError(format!(
                "Report {} has already been added",
                T::name()
            )));
        }
        let file = self.create_file(T::name())?;
        self.file_writers
            .insert(TypeId::of::<T>(), Writer::from_writer(file));
        Ok(())
    }

    fn create_file(&self, short_name: &str) -> Result<File, SimError> {
        let path = self.options.path_for(short_name);
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        if path.exists() && !self.options.overwrite {
            return Err(SimError::ReportError(format!(
                "File already exists: {}. Please set `overwrite` to true in the file options and try again.",
                path.display()
            )));
        }
        trace!("creating report file {}", path.display());
        Ok(File::create(path)?)
    }
}

impl ReportSink for CsvReportSink {
    fn send_report<T: Report>(&mut self, report: &T) -> Result<(), SimError> {
        if !self.file_writers.contains_key(&TypeId::of::<T>()) {
            self.add_report::<T>()?;
        }
        let writer = self
            .file_writers
            .get_mut(&TypeId::of::<T>())
            .ok_or_else(|| SimError::ReportError(format!("No writer found for {}", T::name())))?;
        writer.serialize(report)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SimError> {
        for writer in self.file_writers.values_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Keeps every row in memory as JSON, grouped by report name in arrival order.
#[derive(Debug, Default)]
pub struct MemoryReportSink {
    reports: IndexMap<&'static str, Vec<serde_json::Value>>,
}

impl MemoryReportSink {
    pub fn new() -> MemoryReportSink {
        MemoryReportSink::default()
    }

    pub fn rows(&self, short_name: &str) -> &[serde_json::Value] {
        self.reports
            .get(short_name)
            .map_or(&[][..], |rows| rows.as_slice())
    }

    /// Returns every row of report `T` received so far.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` if a stored row does not deserialize as `T`.
    pub fn records<T: Report + DeserializeOwned>(&self) -> Result<Vec<T>, SimError> {
        self.rows(T::name())
            .iter()
            .map(|row| serde_json::from_value(row.clone()).map_err(SimError::from))
            .collect()
    }

    pub fn clear(&mut self) {
        self.reports.clear();
    }
}

impl ReportSink for MemoryReportSink {
    fn send_report<T: Report>(&mut self, report: &T) -> Result<(), SimError> {
        let row = serde_json::to_value(report)?;
        self.reports.entry(T::name()).or_default().push(row);
        Ok(())
    }
}
