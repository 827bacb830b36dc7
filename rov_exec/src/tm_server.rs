//! # TM Server
//!
//! Collects the telemetry fields written by the modules each cycle and publishes them, together
//! with the module outputs held in the data store, as one JSON packet per line in the session
//! directory.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use log::trace;
use serde::Serialize;

use comms_if::tm::TmSink;
use util::session::Session;

use crate::{arm_ctrl, data_store::DataStore, swerve_ctrl};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Telemetry server
pub struct TmServer {
    writer: Option<BufWriter<File>>,

    /// Fields written since the last packet was sent.
    fields: BTreeMap<String, TmValue>,

    last_packet: Option<TmPacket>,
}

/// Telemetry packet that is output by the server.
#[derive(Debug, Clone, Serialize)]
pub struct TmPacket {
    pub sim_time_s: f64,

    pub safe: bool,

    pub safe_cause: String,

    pub arm_ctrl_output: Option<arm_ctrl::ArmOutput>,

    pub arm_ctrl_status_rpt: arm_ctrl::StatusReport,

    pub swerve_ctrl_outputs: Vec<swerve_ctrl::SwerveOutput>,

    pub swerve_ctrl_status_rpts: Vec<swerve_ctrl::StatusReport>,

    pub fields: BTreeMap<String, TmValue>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A single telemetry value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TmValue {
    Number(f64),
    Bool(bool),
    String(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TmServerError {
    #[error("Could not open the telemetry file {0:?}: {1}")]
    OpenError(PathBuf, std::io::Error),

    #[error("Could not write telemetry: {0}")]
    WriteError(std::io::Error),

    #[error("Could not serialize the telemetry: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TmServer {
    /// Create a new instance of the TM Server, writing to `tm.jsonl` in the session directory.
    pub fn new(session: &Session) -> Result<Self, TmServerError> {
        Self::with_path(session.session_root.join("tm.jsonl"))
    }

    /// Create a new instance of the TM Server writing to the given file.
    pub fn with_path(path: PathBuf) -> Result<Self, TmServerError> {
        let file = File::create(&path).map_err(|e| TmServerError::OpenError(path, e))?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            fields: BTreeMap::new(),
            last_packet: None,
        })
    }

    /// Create a server which keeps only the last packet.
    pub fn in_memory() -> Self {
        Self {
            writer: None,
            fields: BTreeMap::new(),
            last_packet: None,
        }
    }

    /// The most recently sent packet.
    pub fn last_packet(&self) -> Option<&TmPacket> {
        self.last_packet.as_ref()
    }

    /// Build a packet from the data store and the fields written this cycle, and send it.
    pub fn send(&mut self, ds: &DataStore) -> Result<(), TmServerError> {
        let fields = std::mem::take(&mut self.fields);
        let packet = TmPacket::from_datastore(ds, fields);

        if let Some(ref mut writer) = self.writer {
            let packet_string =
                serde_json::to_string(&packet).map_err(TmServerError::SerializationError)?;

            writeln!(writer, "{}", packet_string).map_err(TmServerError::WriteError)?;

            if ds.is_1_hz_cycle {
                writer.flush().map_err(TmServerError::WriteError)?;
            }
        }

        trace!("Sent TM packet with {} fields", packet.fields.len());

        self.last_packet = Some(packet);

        Ok(())
    }

    /// Write out any buffered packets.
    ///
    /// Must be called before the server is dropped, flush errors on drop are lost.
    pub fn flush(&mut self) -> Result<(), TmServerError> {
        match self.writer {
            Some(ref mut writer) => writer.flush().map_err(TmServerError::WriteError),
            None => Ok(()),
        }
    }
}

impl TmSink for TmServer {
    fn put_number(&mut self, key: &str, value: f64) {
        self.fields.insert(key.to_string(), TmValue::Number(value));
    }

    fn put_bool(&mut self, key: &str, value: bool) {
        self.fields.insert(key.to_string(), TmValue::Bool(value));
    }

    fn put_string(&mut self, key: &str, value: &str) {
        self.fields
            .insert(key.to_string(), TmValue::String(value.to_string()));
    }
}

impl TmPacket {
    pub fn from_datastore(ds: &DataStore, fields: BTreeMap<String, TmValue>) -> Self {
        Self {
            sim_time_s: ds.sim_time_s,
            safe: ds.safe,
            safe_cause: match ds.safe_cause {
                Some(c) => format!("{:?}", c),
                None => String::new(),
            },
            arm_ctrl_output: ds.arm_ctrl_output,
            arm_ctrl_status_rpt: ds.arm_ctrl_status_rpt,
            swerve_ctrl_outputs: ds.swerve_ctrl_outputs.clone(),
            swerve_ctrl_status_rpts: ds.swerve_ctrl_status_rpts.clone(),
            fields,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_store::SafeModeCause;

    #[test]
    fn test_fields_collected_per_packet() {
        let mut tm = TmServer::in_memory();
        let mut ds = DataStore::default();
        ds.make_safe(SafeModeCause::MakeSafeTc);

        tm.put_number("major target", 30.0);
        tm.put_bool("At target", false);
        tm.put_string("ArmState", "LOW_SCORE");
        tm.put_number("major target", 60.0);
        tm.send(&ds).unwrap();

        let packet = tm.last_packet().unwrap();
        assert!(packet.safe);
        assert_eq!(packet.safe_cause, "MakeSafeTc");
        assert_eq!(packet.fields.len(), 3);
        assert_eq!(packet.fields["major target"], TmValue::Number(60.0));

        let json = serde_json::to_value(packet).unwrap();
        assert_eq!(json["fields"]["ArmState"], "LOW_SCORE");
        assert_eq!(json["fields"]["At target"], false);

        // Fields don't carry over
        tm.send(&ds).unwrap();
        assert!(tm.last_packet().unwrap().fields.is_empty());

        tm.flush().unwrap();
    }

    #[test]
    fn test_flush_writes_buffered_packets() {
        let path = std::env::temp_dir().join(format!("tm_server_test_{}.jsonl", std::process::id()));
        let mut tm = TmServer::with_path(path.clone()).unwrap();
        let mut ds = DataStore::default();
        ds.is_1_hz_cycle = false;

        tm.put_number("major target", 30.0);
        tm.send(&ds).unwrap();
        tm.send(&ds).unwrap();

        // Packets outside the 1 Hz cycle stay buffered
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        tm.flush().unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["fields"]["major target"], 30.0);

        std::fs::remove_file(&path).unwrap();
    }
}
