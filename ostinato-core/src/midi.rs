//! MIDI seams: the output and device-write traits the engines call through,
//! raw note-message parse/encode, and midir-backed port plumbing for the
//! runner. The engines never see transport framing; they only see these
//! traits.

use std::sync::mpsc::{self, Receiver, Sender};

use midir::{MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use ostinato_types::ParamId;

/// Note emission seam. Within one tick, implementations receive note-off
/// for the previous sounding note before note-on for the next.
pub trait MidiOut {
    fn send_note_on(&mut self, channel: u8, pitch: u8, velocity: u8);
    fn send_note_off(&mut self, channel: u8, pitch: u8, velocity: u8);
}

/// Device parameter write-through seam. Assumed infallible and idempotent.
pub trait ParamWriter {
    fn set_track_param(&mut self, track: u8, param: ParamId, value: u8);
}

/// An incoming note message, already stripped to what the engines consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteMessage {
    On { channel: u8, pitch: u8, velocity: u8 },
    Off { channel: u8, pitch: u8 },
}

/// Parse a raw MIDI message into a note message. Running status is not
/// handled; note-on with velocity 0 maps to note-off.
pub fn parse_note_message(data: &[u8]) -> Option<NoteMessage> {
    if data.len() < 3 {
        return None;
    }
    let channel = data[0] & 0x0F;
    match data[0] & 0xF0 {
        0x80 => Some(NoteMessage::Off {
            channel,
            pitch: data[1],
        }),
        0x90 => {
            if data[2] == 0 {
                Some(NoteMessage::Off {
                    channel,
                    pitch: data[1],
                })
            } else {
                Some(NoteMessage::On {
                    channel,
                    pitch: data[1],
                    velocity: data[2],
                })
            }
        }
        _ => None,
    }
}

pub fn note_on_bytes(channel: u8, pitch: u8, velocity: u8) -> [u8; 3] {
    [0x90 | (channel & 0x0F), pitch & 0x7F, velocity & 0x7F]
}

pub fn note_off_bytes(channel: u8, pitch: u8, velocity: u8) -> [u8; 3] {
    [0x80 | (channel & 0x0F), pitch & 0x7F, velocity & 0x7F]
}

/// Information about an available MIDI port.
#[derive(Debug, Clone)]
pub struct MidiPortInfo {
    pub index: usize,
    pub name: String,
}

/// MIDI output over a midir connection.
pub struct MidirOut {
    connection: MidiOutputConnection,
    port_name: String,
}

impl MidirOut {
    /// List the available output ports.
    pub fn list_ports() -> Vec<MidiPortInfo> {
        let mut ports = Vec::new();
        if let Ok(midi_out) = MidiOutput::new("ostinato") {
            for (index, port) in midi_out.ports().iter().enumerate() {
                if let Ok(name) = midi_out.port_name(port) {
                    ports.push(MidiPortInfo { index, name });
                }
            }
        }
        ports
    }

    /// Connect to an output port by index.
    pub fn connect(port_index: usize) -> Result<Self, String> {
        let midi_out = MidiOutput::new("ostinato").map_err(|e| e.to_string())?;
        let ports = midi_out.ports();
        let port = ports
            .get(port_index)
            .ok_or_else(|| format!("Invalid output port index: {}", port_index))?;
        let port_name = midi_out
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());
        let connection = midi_out
            .connect(port, "ostinato-output")
            .map_err(|e| e.to_string())?;
        Ok(Self {
            connection,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl MidiOut for MidirOut {
    fn send_note_on(&mut self, channel: u8, pitch: u8, velocity: u8) {
        if let Err(e) = self.connection.send(&note_on_bytes(channel, pitch, velocity)) {
            log::warn!(target: "midi", "note-on send failed: {}", e);
        }
    }

    fn send_note_off(&mut self, channel: u8, pitch: u8, velocity: u8) {
        if let Err(e) = self.connection.send(&note_off_bytes(channel, pitch, velocity)) {
            log::warn!(target: "midi", "note-off send failed: {}", e);
        }
    }
}

/// MIDI input manager: connects to a midir input port and hands parsed note
/// messages to the driver loop over a channel, polled non-blocking.
pub struct MidiInputManager {
    midi_in: Option<MidiInput>,
    connection: Option<MidiInputConnection<()>>,
    event_receiver: Option<Receiver<NoteMessage>>,
    connected_port_name: Option<String>,
    available_ports: Vec<MidiPortInfo>,
}

impl MidiInputManager {
    pub fn new() -> Self {
        Self {
            midi_in: MidiInput::new("ostinato").ok(),
            connection: None,
            event_receiver: None,
            connected_port_name: None,
            available_ports: Vec::new(),
        }
    }

    /// Refresh the list of available input ports.
    pub fn refresh_ports(&mut self) {
        self.available_ports.clear();
        if let Some(ref midi_in) = self.midi_in {
            for (index, port) in midi_in.ports().iter().enumerate() {
                if let Ok(name) = midi_in.port_name(port) {
                    self.available_ports.push(MidiPortInfo { index, name });
                }
            }
        }
    }

    pub fn list_ports(&self) -> &[MidiPortInfo] {
        &self.available_ports
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn connected_port_name(&self) -> Option<&str> {
        self.connected_port_name.as_deref()
    }

    /// Connect to an input port by index.
    pub fn connect(&mut self, port_index: usize) -> Result<(), String> {
        self.disconnect();

        // midir consumes the MidiInput on connect; recreate it afterwards
        // so port listing keeps working.
        let midi_in = MidiInput::new("ostinato").map_err(|e| e.to_string())?;
        let ports = midi_in.ports();
        let port = ports
            .get(port_index)
            .ok_or_else(|| format!("Invalid input port index: {}", port_index))?;
        let port_name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let (tx, rx): (Sender<NoteMessage>, Receiver<NoteMessage>) = mpsc::channel();
        let connection = midi_in
            .connect(
                port,
                "ostinato-input",
                move |_timestamp, message, _| {
                    if let Some(msg) = parse_note_message(message) {
                        let _ = tx.send(msg);
                    }
                },
                (),
            )
            .map_err(|e| e.to_string())?;

        self.connection = Some(connection);
        self.event_receiver = Some(rx);
        self.connected_port_name = Some(port_name);
        self.midi_in = MidiInput::new("ostinato").ok();
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
        }
        self.event_receiver = None;
        self.connected_port_name = None;
    }

    /// Drain pending note messages (non-blocking).
    pub fn poll_events(&self) -> Vec<NoteMessage> {
        let mut events = Vec::new();
        if let Some(ref rx) = self.event_receiver {
            while let Ok(msg) = rx.try_recv() {
                events.push(msg);
            }
        }
        events
    }
}

impl Default for MidiInputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MidiInputManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}
