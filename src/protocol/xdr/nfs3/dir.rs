//! Module contains XDR data structures related to directory operations for
//! NFS version 3 protocol as defined in RFC 1813.
//!
//! This module includes data structures for the following operations:
//! - LOOKUP: Look up file name (procedure 3)
//! - CREATE: Create a file (procedure 8)
//! - MKDIR: Create a directory (procedure 9)

// Preserve original RFC naming conventions (e.g. CREATE3args, LOOKUP3resok)
// for consistency with the NFS version 3 protocol specification
#![allow(non_camel_case_types)]

use std::io::{Read, Write};

use crate::protocol::xdr::{deserialize, utils, Deserialize, Serialize};
use crate::{DeserializeStruct, SerializeStruct};

use super::*;

/// Successful response for the LOOKUP procedure as defined in RFC 1813
/// section 3.3.3
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LOOKUP3resok {
    /// File handle of the object that was looked up
    pub object: nfs_fh3,
    /// Attributes of the object
    pub obj_attributes: post_op_attr,
    /// Attributes of the directory the lookup ran in
    pub dir_attributes: post_op_attr,
}
DeserializeStruct!(LOOKUP3resok, object, obj_attributes, dir_attributes);
SerializeStruct!(LOOKUP3resok, object, obj_attributes, dir_attributes);

/// How a CREATE request wants the file brought into existence, as defined
/// in RFC 1813 section 3.3.8.
///
/// UNCHECKED and GUARDED carry the initial attributes for the new file;
/// EXCLUSIVE carries the client's idempotency verifier instead.
#[derive(Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum createhow3 {
    /// Create the file without checking for prior existence
    UNCHECKED(sattr3),
    /// Fail with NFS3ERR_EXIST if the file already exists
    GUARDED(sattr3),
    /// Create exclusively, using the verifier to make retries idempotent
    EXCLUSIVE(createverf3),
}

impl Default for createhow3 {
    fn default() -> createhow3 {
        createhow3::UNCHECKED(sattr3::default())
    }
}

impl Serialize for createhow3 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            createhow3::UNCHECKED(v) => {
                0_u32.serialize(dest)?;
                v.serialize(dest)
            }
            createhow3::GUARDED(v) => {
                1_u32.serialize(dest)?;
                v.serialize(dest)
            }
            createhow3::EXCLUSIVE(v) => {
                2_u32.serialize(dest)?;
                v.serialize(dest)
            }
        }
    }
}

impl Deserialize for createhow3 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        match deserialize::<u32>(src)? {
            0 => *self = createhow3::UNCHECKED(deserialize(src)?),
            1 => *self = createhow3::GUARDED(deserialize(src)?),
            2 => *self = createhow3::EXCLUSIVE(deserialize(src)?),
            c => {
                return Err(utils::invalid_data(format!("Invalid createhow3 value: {}", c)));
            }
        }

        Ok(())
    }
}

/// Arguments for the CREATE procedure (procedure 8) as defined in RFC 1813
/// section 3.3.8
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CREATE3args {
    /// Directory and name for the new file
    pub dirops: diropargs3,
    /// How the file should be created
    pub how: createhow3,
}
DeserializeStruct!(CREATE3args, dirops, how);
SerializeStruct!(CREATE3args, dirops, how);

/// Successful response for the CREATE procedure as defined in RFC 1813
/// section 3.3.8
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CREATE3resok {
    /// File handle of the new file, when the server chose to return one
    pub obj: post_op_fh3,
    /// Attributes of the new file
    pub obj_attributes: post_op_attr,
    /// Weak cache consistency data for the parent directory
    pub dir_wcc: wcc_data,
}
DeserializeStruct!(CREATE3resok, obj, obj_attributes, dir_wcc);
SerializeStruct!(CREATE3resok, obj, obj_attributes, dir_wcc);

/// Arguments for the MKDIR procedure (procedure 9) as defined in RFC 1813
/// section 3.3.9
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MKDIR3args {
    /// Directory and name for the new directory
    pub dirops: diropargs3,
    /// Initial attributes for the new directory
    pub attributes: sattr3,
}
DeserializeStruct!(MKDIR3args, dirops, attributes);
SerializeStruct!(MKDIR3args, dirops, attributes);

/// Successful response for the MKDIR procedure as defined in RFC 1813
/// section 3.3.9
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MKDIR3resok {
    /// File handle of the new directory, when the server chose to return one
    pub obj: post_op_fh3,
    /// Attributes of the new directory
    pub obj_attributes: post_op_attr,
    /// Weak cache consistency data for the parent directory
    pub dir_wcc: wcc_data,
}
DeserializeStruct!(MKDIR3resok, obj, obj_attributes, dir_wcc);
SerializeStruct!(MKDIR3resok, obj, obj_attributes, dir_wcc);
