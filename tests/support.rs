// Each test binary pulls in the subset of this module it needs.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;

use nfs_sable::dispatcher::{
    self, CreateRes, FileStat, MkdirRes, NfsDispatcher, RequestContext, StatFs, TimeSpec,
    VfsError, VfsResult, WriteRes,
};
use nfs_sable::xdr::nfs3::{fileid3, filename3, nfspath3};
use nfs_sable::xdr::rpc::accept_stat;
use nfs_sable::xdr::{self, nfs3};

pub const ROOT_ID: fileid3 = 1;

/// In-memory dispatcher double.
///
/// Attribute and lookup tables answer the read-side operations; the
/// mutating operations return whatever result was planted in their slot,
/// defaulting to ENOTSUP. Every invocation is recorded so tests can assert
/// which operations ran.
pub struct TestDispatcher {
    pub attrs: Mutex<HashMap<fileid3, FileStat>>,
    pub parents: Mutex<HashMap<fileid3, fileid3>>,
    pub lookups: Mutex<HashMap<(fileid3, Vec<u8>), fileid3>>,
    pub readlink_result: Mutex<Option<VfsResult<nfspath3>>>,
    pub write_result: Mutex<Option<VfsResult<WriteRes>>>,
    pub create_result: Mutex<Option<VfsResult<CreateRes>>>,
    pub mkdir_result: Mutex<Option<VfsResult<MkdirRes>>>,
    pub statfs_result: Mutex<Option<VfsResult<StatFs>>>,
    pub written: Mutex<Option<(u64, Vec<u8>)>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl TestDispatcher {
    pub fn new() -> TestDispatcher {
        TestDispatcher {
            attrs: Mutex::new(HashMap::new()),
            parents: Mutex::new(HashMap::new()),
            lookups: Mutex::new(HashMap::new()),
            readlink_result: Mutex::new(None),
            write_result: Mutex::new(None),
            create_result: Mutex::new(None),
            mkdir_result: Mutex::new(None),
            statfs_result: Mutex::new(None),
            written: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn insert_attr(&self, ino: fileid3, stat: FileStat) {
        self.attrs.lock().unwrap().insert(ino, stat);
    }

    pub fn insert_parent(&self, ino: fileid3, parent: fileid3) {
        self.parents.lock().unwrap().insert(ino, parent);
    }

    pub fn insert_lookup(&self, dir: fileid3, name: &[u8], ino: fileid3) {
        self.lookups.lock().unwrap().insert((dir, name.to_vec()), ino);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str) {
        self.calls.lock().unwrap().push(op);
    }
}

#[async_trait]
impl NfsDispatcher for TestDispatcher {
    async fn getattr(&self, ino: fileid3, _ctx: &RequestContext) -> VfsResult<FileStat> {
        self.record("getattr");
        self.attrs
            .lock()
            .unwrap()
            .get(&ino)
            .copied()
            .ok_or(VfsError::Errno(libc::ENOENT))
    }

    async fn get_parent(&self, ino: fileid3, _ctx: &RequestContext) -> VfsResult<fileid3> {
        self.record("get_parent");
        self.parents
            .lock()
            .unwrap()
            .get(&ino)
            .copied()
            .ok_or(VfsError::Errno(libc::ENOENT))
    }

    async fn lookup(
        &self,
        dir: fileid3,
        name: &filename3,
        _ctx: &RequestContext,
    ) -> VfsResult<(fileid3, FileStat)> {
        self.record("lookup");
        let ino = self
            .lookups
            .lock()
            .unwrap()
            .get(&(dir, name.as_ref().to_vec()))
            .copied()
            .ok_or(VfsError::Errno(libc::ENOENT))?;
        let stat = self
            .attrs
            .lock()
            .unwrap()
            .get(&ino)
            .copied()
            .ok_or(VfsError::Errno(libc::ENOENT))?;
        Ok((ino, stat))
    }

    async fn readlink(&self, _ino: fileid3, _ctx: &RequestContext) -> VfsResult<nfspath3> {
        self.record("readlink");
        if let Some(result) = self.readlink_result.lock().unwrap().take() {
            return result;
        }
        Err(VfsError::Errno(libc::ENOTSUP))
    }

    async fn write(
        &self,
        _ino: fileid3,
        data: Vec<u8>,
        offset: u64,
        _ctx: &RequestContext,
    ) -> VfsResult<WriteRes> {
        self.record("write");
        *self.written.lock().unwrap() = Some((offset, data));
        if let Some(result) = self.write_result.lock().unwrap().take() {
            return result;
        }
        Err(VfsError::Errno(libc::ENOTSUP))
    }

    async fn create(
        &self,
        _dir: fileid3,
        _name: &filename3,
        _mode: u32,
        _ctx: &RequestContext,
    ) -> VfsResult<CreateRes> {
        self.record("create");
        if let Some(result) = self.create_result.lock().unwrap().take() {
            return result;
        }
        Err(VfsError::Errno(libc::ENOTSUP))
    }

    async fn mkdir(
        &self,
        _dir: fileid3,
        _name: &filename3,
        _mode: u32,
        _ctx: &RequestContext,
    ) -> VfsResult<MkdirRes> {
        self.record("mkdir");
        if let Some(result) = self.mkdir_result.lock().unwrap().take() {
            return result;
        }
        Err(VfsError::Errno(libc::ENOTSUP))
    }

    async fn statfs(&self, _ino: fileid3, _ctx: &RequestContext) -> VfsResult<StatFs> {
        self.record("statfs");
        if let Some(result) = self.statfs_result.lock().unwrap().take() {
            return result;
        }
        Err(VfsError::Errno(libc::ENOTSUP))
    }
}

pub fn dir_stat(ino: fileid3) -> FileStat {
    FileStat {
        mode: dispatcher::S_IFDIR | 0o755,
        nlink: 2,
        size: 4096,
        blocks: 8,
        dev: 7,
        ino,
        atime: TimeSpec { sec: 100, nsec: 1 },
        mtime: TimeSpec { sec: 200, nsec: 2 },
        ctime: TimeSpec { sec: 300, nsec: 3 },
        ..FileStat::default()
    }
}

pub fn file_stat(ino: fileid3, size: u64) -> FileStat {
    FileStat {
        mode: dispatcher::S_IFREG | 0o644,
        nlink: 1,
        size,
        blocks: (size + 511) / 512,
        dev: 7,
        ino,
        atime: TimeSpec { sec: 10, nsec: 0 },
        mtime: TimeSpec { sec: 20, nsec: 0 },
        ctime: TimeSpec { sec: 30, nsec: 0 },
        ..FileStat::default()
    }
}

pub fn read_accept_stat(output: &mut Cursor<Vec<u8>>) -> accept_stat {
    xdr::deserialize::<accept_stat>(output).expect("deserialize accept_stat")
}

pub fn read_status(output: &mut Cursor<Vec<u8>>) -> nfs3::nfsstat3 {
    let accept = read_accept_stat(output);
    assert_eq!(accept, accept_stat::SUCCESS);
    xdr::deserialize::<nfs3::nfsstat3>(output).expect("deserialize nfsstat3")
}
