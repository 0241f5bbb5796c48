//! Entities mirrored from the backend and the payloads sent back to it.

pub mod karkun;
pub mod khat;
pub mod mehfil;
pub mod message;
pub mod naat_shareef;
pub mod tarteeb;
pub mod taxonomy;
pub mod types;
pub mod zone;
