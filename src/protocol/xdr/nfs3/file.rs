//! Module contains XDR data structures related to file operations for NFS
//! version 3 protocol as defined in RFC 1813.
//!
//! This module includes data structures for the following operations:
//! - READLINK: Read from symbolic link (procedure 5)
//! - WRITE: Write data to a file (procedure 7)
//! - LINK: Create a hard link (procedure 15)
//!
//! The structures implement the XDR serialization/deserialization interfaces
//! for the request arguments and response data of these operations.

// Preserve original RFC naming conventions (e.g. WRITE3args, LINK3resfail)
// for consistency with the NFS version 3 protocol specification
#![allow(non_camel_case_types)]

use num_derive::{FromPrimitive, ToPrimitive};

use crate::protocol::xdr::{Deserialize, Serialize};
use crate::{DeserializeEnum, DeserializeStruct, SerializeEnum, SerializeStruct};

use super::*;

/// Enumeration specifying how data should be committed to storage
/// as defined in RFC 1813 section 3.3.7
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum stable_how {
    /// Data may be buffered before writing to stable storage
    /// The server may return before the data is committed to stable storage
    #[default]
    UNSTABLE = 0,
    /// Data must be committed to stable storage before returning
    /// Only the data for this request is guaranteed to be committed
    DATA_SYNC = 1,
    /// All file system data must be committed to stable storage before
    /// returning. This includes the data and all metadata for this request
    FILE_SYNC = 2,
}
SerializeEnum!(stable_how);
DeserializeEnum!(stable_how);

/// Arguments for the WRITE procedure (procedure 7) as defined in RFC 1813
/// section 3.3.7. Used to write data to a regular file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WRITE3args {
    /// File handle for the file to write
    pub file: nfs_fh3,
    /// Position within the file to begin writing
    pub offset: offset3,
    /// Number of bytes of data to write
    pub count: count3,
    /// How to commit the data to storage
    pub stable: stable_how,
    /// The data to be written
    pub data: Vec<u8>,
}
DeserializeStruct!(WRITE3args, file, offset, count, stable, data);
SerializeStruct!(WRITE3args, file, offset, count, stable, data);

/// Successful response for the WRITE procedure as defined in RFC 1813
/// section 3.3.7
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WRITE3resok {
    /// File attributes before and after the operation
    pub file_wcc: wcc_data,
    /// Number of bytes actually written
    pub count: count3,
    /// How the data was committed to stable storage
    pub committed: stable_how,
    /// Write verifier to detect server restarts
    pub verf: writeverf3,
}
DeserializeStruct!(WRITE3resok, file_wcc, count, committed, verf);
SerializeStruct!(WRITE3resok, file_wcc, count, committed, verf);

/// Successful response for the READLINK procedure as defined in RFC 1813
/// section 3.3.5
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct READLINK3resok {
    /// Attributes of the symbolic link itself
    pub symlink_attributes: post_op_attr,
    /// The target path the link points at
    pub data: nfspath3,
}
DeserializeStruct!(READLINK3resok, symlink_attributes, data);
SerializeStruct!(READLINK3resok, symlink_attributes, data);

/// Arguments for the LINK procedure (procedure 15) as defined in RFC 1813
/// section 3.3.15. Used to create a hard link to a file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LINK3args {
    /// File handle for the target file
    pub file: nfs_fh3,
    /// Directory and name for the new link
    pub link: diropargs3,
}
DeserializeStruct!(LINK3args, file, link);
SerializeStruct!(LINK3args, file, link);

/// Failure response for the LINK procedure as defined in RFC 1813
/// section 3.3.15
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LINK3resfail {
    /// Attributes of the file that was to be linked
    pub file_attributes: post_op_attr,
    /// Weak cache consistency data for the link directory
    pub linkdir_wcc: wcc_data,
}
DeserializeStruct!(LINK3resfail, file_attributes, linkdir_wcc);
SerializeStruct!(LINK3resfail, file_attributes, linkdir_wcc);
