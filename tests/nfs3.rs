use std::io::Cursor;
use std::sync::{Arc, Mutex};

mod support;

use nfs_sable::dispatcher::{CreateRes, MkdirRes, StatFs, VfsError, WriteRes};
use nfs_sable::server::Nfsd3;
use nfs_sable::xdr::rpc::accept_stat;
use nfs_sable::xdr::{self, nfs3, Serialize};

use support::{dir_stat, file_stat, read_accept_stat, read_status, TestDispatcher, ROOT_ID};

async fn dispatch(
    server: &Nfsd3,
    proc: nfs3::NFSProgram,
    args: &[u8],
) -> Cursor<Vec<u8>> {
    let mut output = Vec::new();
    server
        .dispatch_rpc(42, nfs3::PROGRAM, nfs3::VERSION, proc as u32, args, &mut output)
        .await
        .expect("dispatch_rpc");
    Cursor::new(output)
}

fn serialize_args(value: &impl Serialize) -> Vec<u8> {
    let mut buf = Vec::new();
    value.serialize(&mut buf).expect("serialize args");
    buf
}

fn assert_consumed(cursor: &Cursor<Vec<u8>>) {
    assert_eq!(cursor.position(), cursor.get_ref().len() as u64, "reply has trailing bytes");
}

#[tokio::test]
async fn getattr_missing_inode_maps_to_noent() {
    let server = Nfsd3::new(Arc::new(TestDispatcher::new()), true);

    let args = serialize_args(&nfs3::nfs_fh3 { ino: 42 });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_GETATTR, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_NOENT);
    assert_consumed(&reply);
}

#[tokio::test]
async fn getattr_returns_converted_attributes() {
    let fs = Arc::new(TestDispatcher::new());
    fs.insert_attr(2, file_stat(2, 1024));
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::nfs_fh3 { ino: 2 });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_GETATTR, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let attr = xdr::deserialize::<nfs3::fattr3>(&mut reply).expect("deserialize fattr3");
    assert_eq!(attr.ftype, nfs3::ftype3::NF3REG);
    assert_eq!(attr.fileid, 2);
    assert_eq!(attr.size, 1024);
    assert_eq!(attr.used, file_stat(2, 1024).blocks * 512);
    assert_eq!(attr.fsid, 7);
    assert_consumed(&reply);
}

#[tokio::test]
async fn lookup_dot_returns_the_directory_itself() {
    let fs = Arc::new(TestDispatcher::new());
    fs.insert_attr(42, dir_stat(42));
    let server = Nfsd3::new(fs.clone(), true);

    let args = serialize_args(&nfs3::diropargs3 {
        dir: nfs3::nfs_fh3 { ino: 42 },
        name: b".".as_ref().into(),
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_LOOKUP, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let res = xdr::deserialize::<nfs3::dir::LOOKUP3resok>(&mut reply).expect("deserialize resok");
    assert_eq!(res.object.ino, 42);
    match res.obj_attributes {
        nfs3::post_op_attr::Some(attr) => {
            assert_eq!(attr.ftype, nfs3::ftype3::NF3DIR);
            assert_eq!(attr.fileid, 42);
        }
        nfs3::post_op_attr::None => panic!("missing object attributes"),
    }
    assert!(matches!(res.dir_attributes, nfs3::post_op_attr::Some(_)));
    assert_consumed(&reply);

    // "." resolves through getattr, never through the name lookup.
    assert!(!fs.calls().contains(&"lookup"));
}

#[tokio::test]
async fn lookup_dotdot_returns_the_parent() {
    let fs = Arc::new(TestDispatcher::new());
    fs.insert_attr(ROOT_ID, dir_stat(ROOT_ID));
    fs.insert_attr(5, dir_stat(5));
    fs.insert_parent(5, ROOT_ID);
    let server = Nfsd3::new(fs.clone(), true);

    let args = serialize_args(&nfs3::diropargs3 {
        dir: nfs3::nfs_fh3 { ino: 5 },
        name: b"..".as_ref().into(),
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_LOOKUP, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let res = xdr::deserialize::<nfs3::dir::LOOKUP3resok>(&mut reply).expect("deserialize resok");
    assert_eq!(res.object.ino, ROOT_ID);
    assert!(fs.calls().contains(&"get_parent"));
    assert!(!fs.calls().contains(&"lookup"));
}

#[tokio::test]
async fn lookup_resolves_names_through_the_dispatcher() {
    let fs = Arc::new(TestDispatcher::new());
    fs.insert_attr(ROOT_ID, dir_stat(ROOT_ID));
    fs.insert_attr(2, file_stat(2, 11));
    fs.insert_lookup(ROOT_ID, b"a.txt", 2);
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::diropargs3 {
        dir: nfs3::nfs_fh3 { ino: ROOT_ID },
        name: b"a.txt".as_ref().into(),
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_LOOKUP, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let res = xdr::deserialize::<nfs3::dir::LOOKUP3resok>(&mut reply).expect("deserialize resok");
    assert_eq!(res.object.ino, 2);
    match res.dir_attributes {
        nfs3::post_op_attr::Some(attr) => assert_eq!(attr.fileid, ROOT_ID),
        nfs3::post_op_attr::None => panic!("missing directory attributes"),
    }
}

#[tokio::test]
async fn lookup_failure_still_reports_directory_attributes() {
    let fs = Arc::new(TestDispatcher::new());
    fs.insert_attr(ROOT_ID, dir_stat(ROOT_ID));
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::diropargs3 {
        dir: nfs3::nfs_fh3 { ino: ROOT_ID },
        name: b"missing".as_ref().into(),
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_LOOKUP, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_NOENT);
    let dir_attr =
        xdr::deserialize::<nfs3::post_op_attr>(&mut reply).expect("deserialize post_op_attr");
    assert!(matches!(dir_attr, nfs3::post_op_attr::Some(_)));
    assert_consumed(&reply);
}

#[tokio::test]
async fn lookup_rejects_names_longer_than_name_max() {
    let fs = Arc::new(TestDispatcher::new());
    fs.insert_attr(ROOT_ID, dir_stat(ROOT_ID));
    let server = Nfsd3::new(fs.clone(), true);

    let long_name = vec![b'x'; nfs3::NAME_MAX as usize + 1];
    let args = serialize_args(&nfs3::diropargs3 {
        dir: nfs3::nfs_fh3 { ino: ROOT_ID },
        name: long_name.as_slice().into(),
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_LOOKUP, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_NAMETOOLONG);
    let dir_attr =
        xdr::deserialize::<nfs3::post_op_attr>(&mut reply).expect("deserialize post_op_attr");
    assert!(matches!(dir_attr, nfs3::post_op_attr::Some(_)));
    assert!(!fs.calls().contains(&"lookup"));
}

#[tokio::test]
async fn access_echoes_the_requested_mask() {
    let fs = Arc::new(TestDispatcher::new());
    fs.insert_attr(2, file_stat(2, 0));
    let server = Nfsd3::new(fs, true);

    let mut args = serialize_args(&nfs3::nfs_fh3 { ino: 2 });
    args.extend_from_slice(&serialize_args(&(nfs3::ACCESS3_READ | nfs3::ACCESS3_MODIFY)));
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_ACCESS, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let attr =
        xdr::deserialize::<nfs3::post_op_attr>(&mut reply).expect("deserialize post_op_attr");
    assert!(matches!(attr, nfs3::post_op_attr::Some(_)));
    let granted = xdr::deserialize::<u32>(&mut reply).expect("deserialize access");
    assert_eq!(granted, nfs3::ACCESS3_READ | nfs3::ACCESS3_MODIFY);
    assert_consumed(&reply);
}

#[tokio::test]
async fn access_failure_reports_absent_attributes() {
    let server = Nfsd3::new(Arc::new(TestDispatcher::new()), true);

    let mut args = serialize_args(&nfs3::nfs_fh3 { ino: 9 });
    args.extend_from_slice(&serialize_args(&nfs3::ACCESS3_READ));
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_ACCESS, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_NOENT);
    let attr =
        xdr::deserialize::<nfs3::post_op_attr>(&mut reply).expect("deserialize post_op_attr");
    assert!(matches!(attr, nfs3::post_op_attr::None));
}

#[tokio::test]
async fn readlink_returns_target_and_attributes() {
    let fs = Arc::new(TestDispatcher {
        readlink_result: Mutex::new(Some(Ok(b"../target".as_ref().into()))),
        ..TestDispatcher::new()
    });
    let mut link_stat = file_stat(3, 9);
    link_stat.mode = nfs_sable::dispatcher::S_IFLNK | 0o777;
    fs.insert_attr(3, link_stat);
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::nfs_fh3 { ino: 3 });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_READLINK, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let res =
        xdr::deserialize::<nfs3::file::READLINK3resok>(&mut reply).expect("deserialize resok");
    assert_eq!(res.data.as_ref(), b"../target");
    match res.symlink_attributes {
        nfs3::post_op_attr::Some(attr) => assert_eq!(attr.ftype, nfs3::ftype3::NF3LNK),
        nfs3::post_op_attr::None => panic!("missing symlink attributes"),
    }
    assert_consumed(&reply);
}

#[tokio::test]
async fn readlink_failure_still_reports_attributes() {
    let fs = Arc::new(TestDispatcher {
        readlink_result: Mutex::new(Some(Err(VfsError::Errno(libc::EINVAL)))),
        ..TestDispatcher::new()
    });
    fs.insert_attr(2, file_stat(2, 0));
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::nfs_fh3 { ino: 2 });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_READLINK, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_INVAL);
    let attr =
        xdr::deserialize::<nfs3::post_op_attr>(&mut reply).expect("deserialize post_op_attr");
    assert!(matches!(attr, nfs3::post_op_attr::Some(_)));
}

#[tokio::test]
async fn write_reports_count_file_sync_and_wcc() {
    let fs = Arc::new(TestDispatcher {
        write_result: Mutex::new(Some(Ok(WriteRes {
            written: 8192,
            pre_stat: None,
            post_stat: Some(file_stat(2, 8192)),
        }))),
        ..TestDispatcher::new()
    });
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::file::WRITE3args {
        file: nfs3::nfs_fh3 { ino: 2 },
        offset: 0,
        count: 8192,
        stable: nfs3::file::stable_how::UNSTABLE,
        data: vec![7; 8192],
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_WRITE, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let res = xdr::deserialize::<nfs3::file::WRITE3resok>(&mut reply).expect("deserialize resok");
    assert!(matches!(res.file_wcc.before, nfs3::pre_op_attr::None));
    assert!(matches!(res.file_wcc.after, nfs3::post_op_attr::Some(_)));
    assert_eq!(res.count, 8192);
    assert_eq!(res.committed, nfs3::file::stable_how::FILE_SYNC);
    assert_eq!(res.verf, 0);
    assert_consumed(&reply);
}

#[tokio::test]
async fn write_passes_only_count_bytes_to_the_dispatcher() {
    let fs = Arc::new(TestDispatcher {
        write_result: Mutex::new(Some(Ok(WriteRes {
            written: 4,
            pre_stat: None,
            post_stat: None,
        }))),
        ..TestDispatcher::new()
    });
    let server = Nfsd3::new(fs.clone(), true);

    let args = serialize_args(&nfs3::file::WRITE3args {
        file: nfs3::nfs_fh3 { ino: 2 },
        offset: 16,
        count: 4,
        stable: nfs3::file::stable_how::FILE_SYNC,
        data: b"over-sent".to_vec(),
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_WRITE, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let written = fs.written.lock().unwrap().take().expect("dispatcher saw the write");
    assert_eq!(written.0, 16);
    assert_eq!(written.1, b"over".to_vec());
}

#[tokio::test]
async fn write_failure_carries_empty_wcc_data() {
    let fs = Arc::new(TestDispatcher {
        write_result: Mutex::new(Some(Err(VfsError::Errno(libc::EDQUOT)))),
        ..TestDispatcher::new()
    });
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::file::WRITE3args {
        file: nfs3::nfs_fh3 { ino: 2 },
        offset: 0,
        count: 1,
        stable: nfs3::file::stable_how::UNSTABLE,
        data: vec![0],
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_WRITE, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_DQUOT);
    let wcc = xdr::deserialize::<nfs3::wcc_data>(&mut reply).expect("deserialize wcc_data");
    assert!(matches!(wcc.before, nfs3::pre_op_attr::None));
    assert!(matches!(wcc.after, nfs3::post_op_attr::None));
    assert_consumed(&reply);
}

#[tokio::test]
async fn create_exclusive_is_unsupported() {
    let fs = Arc::new(TestDispatcher::new());
    let server = Nfsd3::new(fs.clone(), true);

    let args = serialize_args(&nfs3::dir::CREATE3args {
        dirops: nfs3::diropargs3 {
            dir: nfs3::nfs_fh3 { ino: ROOT_ID },
            name: b"file".as_ref().into(),
        },
        how: nfs3::dir::createhow3::EXCLUSIVE([9; 8]),
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_CREATE, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_NOTSUPP);
    let _wcc = xdr::deserialize::<nfs3::wcc_data>(&mut reply).expect("deserialize wcc_data");
    assert!(fs.calls().is_empty(), "dispatcher must not be called");
}

#[tokio::test]
async fn create_unchecked_on_existing_file_pretends_success() {
    let fs = Arc::new(TestDispatcher {
        create_result: Mutex::new(Some(Err(VfsError::Errno(libc::EEXIST)))),
        ..TestDispatcher::new()
    });
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::dir::CREATE3args {
        dirops: nfs3::diropargs3 {
            dir: nfs3::nfs_fh3 { ino: ROOT_ID },
            name: b"file".as_ref().into(),
        },
        how: nfs3::dir::createhow3::UNCHECKED(nfs3::sattr3::default()),
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_CREATE, &args).await;

    // Nothing is populated; the client is forced into a LOOKUP to learn
    // the handle and attributes of the existing file.
    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let res = xdr::deserialize::<nfs3::dir::CREATE3resok>(&mut reply).expect("deserialize resok");
    assert!(matches!(res.obj, nfs3::post_op_fh3::None));
    assert!(matches!(res.obj_attributes, nfs3::post_op_attr::None));
    assert!(matches!(res.dir_wcc.before, nfs3::pre_op_attr::None));
    assert!(matches!(res.dir_wcc.after, nfs3::post_op_attr::None));
    assert_consumed(&reply);
}

#[tokio::test]
async fn create_guarded_on_existing_file_reports_exist() {
    let fs = Arc::new(TestDispatcher {
        create_result: Mutex::new(Some(Err(VfsError::Errno(libc::EEXIST)))),
        ..TestDispatcher::new()
    });
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::dir::CREATE3args {
        dirops: nfs3::diropargs3 {
            dir: nfs3::nfs_fh3 { ino: ROOT_ID },
            name: b"file".as_ref().into(),
        },
        how: nfs3::dir::createhow3::GUARDED(nfs3::sattr3::default()),
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_CREATE, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_EXIST);
    let _wcc = xdr::deserialize::<nfs3::wcc_data>(&mut reply).expect("deserialize wcc_data");
}

#[tokio::test]
async fn create_success_returns_handle_attributes_and_wcc() {
    let fs = Arc::new(TestDispatcher {
        create_result: Mutex::new(Some(Ok(CreateRes {
            ino: 3,
            stat: file_stat(3, 0),
            pre_dir_stat: Some(dir_stat(ROOT_ID)),
            post_dir_stat: Some(dir_stat(ROOT_ID)),
        }))),
        ..TestDispatcher::new()
    });
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::dir::CREATE3args {
        dirops: nfs3::diropargs3 {
            dir: nfs3::nfs_fh3 { ino: ROOT_ID },
            name: b"new".as_ref().into(),
        },
        how: nfs3::dir::createhow3::UNCHECKED(nfs3::sattr3::default()),
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_CREATE, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let res = xdr::deserialize::<nfs3::dir::CREATE3resok>(&mut reply).expect("deserialize resok");
    match res.obj {
        nfs3::post_op_fh3::Some(fh) => assert_eq!(fh.ino, 3),
        nfs3::post_op_fh3::None => panic!("missing file handle"),
    }
    assert!(matches!(res.obj_attributes, nfs3::post_op_attr::Some(_)));
    assert!(matches!(res.dir_wcc.before, nfs3::pre_op_attr::Some(_)));
    assert!(matches!(res.dir_wcc.after, nfs3::post_op_attr::Some(_)));
}

#[tokio::test]
async fn mkdir_rejects_dot_names_without_calling_the_dispatcher() {
    for name in [b".".as_ref(), b"..".as_ref()] {
        let fs = Arc::new(TestDispatcher::new());
        let server = Nfsd3::new(fs.clone(), true);

        let args = serialize_args(&nfs3::dir::MKDIR3args {
            dirops: nfs3::diropargs3 {
                dir: nfs3::nfs_fh3 { ino: ROOT_ID },
                name: name.into(),
            },
            attributes: nfs3::sattr3::default(),
        });
        let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_MKDIR, &args).await;

        assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_EXIST);
        let _wcc = xdr::deserialize::<nfs3::wcc_data>(&mut reply).expect("deserialize wcc_data");
        assert!(fs.calls().is_empty(), "dispatcher must not be called for {:?}", name);
    }
}

#[tokio::test]
async fn mkdir_success_returns_handle_attributes_and_wcc() {
    let fs = Arc::new(TestDispatcher {
        mkdir_result: Mutex::new(Some(Ok(MkdirRes {
            ino: 8,
            stat: dir_stat(8),
            pre_dir_stat: Some(dir_stat(ROOT_ID)),
            post_dir_stat: Some(dir_stat(ROOT_ID)),
        }))),
        ..TestDispatcher::new()
    });
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::dir::MKDIR3args {
        dirops: nfs3::diropargs3 {
            dir: nfs3::nfs_fh3 { ino: ROOT_ID },
            name: b"subdir".as_ref().into(),
        },
        attributes: nfs3::sattr3::default(),
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_MKDIR, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let res = xdr::deserialize::<nfs3::dir::MKDIR3resok>(&mut reply).expect("deserialize resok");
    match res.obj {
        nfs3::post_op_fh3::Some(fh) => assert_eq!(fh.ino, 8),
        nfs3::post_op_fh3::None => panic!("missing directory handle"),
    }
    match res.obj_attributes {
        nfs3::post_op_attr::Some(attr) => assert_eq!(attr.ftype, nfs3::ftype3::NF3DIR),
        nfs3::post_op_attr::None => panic!("missing directory attributes"),
    }
}

#[tokio::test]
async fn link_is_always_unsupported() {
    let fs = Arc::new(TestDispatcher::new());
    fs.insert_attr(2, file_stat(2, 5));
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::file::LINK3args {
        file: nfs3::nfs_fh3 { ino: 2 },
        link: nfs3::diropargs3 {
            dir: nfs3::nfs_fh3 { ino: ROOT_ID },
            name: b"hardlink".as_ref().into(),
        },
    });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_LINK, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_NOTSUPP);
    let res =
        xdr::deserialize::<nfs3::file::LINK3resfail>(&mut reply).expect("deserialize resfail");
    match res.file_attributes {
        nfs3::post_op_attr::Some(attr) => assert_eq!(attr.fileid, 2),
        nfs3::post_op_attr::None => panic!("missing source attributes"),
    }
    assert!(matches!(res.linkdir_wcc.before, nfs3::pre_op_attr::None));
    assert!(matches!(res.linkdir_wcc.after, nfs3::post_op_attr::None));
    assert_consumed(&reply);
}

#[tokio::test]
async fn fsstat_reports_statfs_derived_numbers() {
    let fs = Arc::new(TestDispatcher {
        statfs_result: Mutex::new(Some(Ok(StatFs {
            blocks: 1000,
            bsize: 4096,
            bfree: 500,
            bavail: 400,
            files: 256,
            ffree: 100,
        }))),
        ..TestDispatcher::new()
    });
    fs.insert_attr(ROOT_ID, dir_stat(ROOT_ID));
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::nfs_fh3 { ino: ROOT_ID });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_FSSTAT, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let res = xdr::deserialize::<nfs3::fs::FSSTAT3resok>(&mut reply).expect("deserialize resok");
    assert!(matches!(res.obj_attributes, nfs3::post_op_attr::Some(_)));
    assert_eq!(res.tbytes, 4_096_000);
    assert_eq!(res.fbytes, 2_048_000);
    assert_eq!(res.abytes, 160_000);
    assert_eq!(res.tfiles, 256);
    assert_eq!(res.ffiles, 100);
    assert_eq!(res.afiles, 100);
    assert_eq!(res.invarsec, 0);
    assert_consumed(&reply);
}

#[tokio::test]
async fn fsstat_failure_still_reports_root_attributes() {
    let fs = Arc::new(TestDispatcher::new());
    fs.insert_attr(ROOT_ID, dir_stat(ROOT_ID));
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::nfs_fh3 { ino: ROOT_ID });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_FSSTAT, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_NOTSUPP);
    let attr =
        xdr::deserialize::<nfs3::post_op_attr>(&mut reply).expect("deserialize post_op_attr");
    assert!(matches!(attr, nfs3::post_op_attr::Some(_)));
}

#[tokio::test]
async fn fsinfo_reports_static_limits() {
    let server = Nfsd3::new(Arc::new(TestDispatcher::new()), true);

    let args = serialize_args(&nfs3::nfs_fh3 { ino: ROOT_ID });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_FSINFO, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
    let res = xdr::deserialize::<nfs3::fs::FSINFO3resok>(&mut reply).expect("deserialize resok");
    assert!(matches!(res.obj_attributes, nfs3::post_op_attr::None));
    assert_eq!(res.rtmax, 1024 * 1024);
    assert_eq!(res.rtpref, 1024 * 1024);
    assert_eq!(res.rtmult, 1);
    assert_eq!(res.wtmax, 1024 * 1024);
    assert_eq!(res.wtpref, 1024 * 1024);
    assert_eq!(res.wtmult, 1);
    assert_eq!(res.dtpref, 1024 * 1024);
    assert_eq!(res.maxfilesize, u64::MAX);
    assert_eq!(res.time_delta, nfs3::nfstime3 { seconds: 0, nseconds: 1 });
    assert_eq!(
        res.properties,
        nfs3::fs::FSF_SYMLINK | nfs3::fs::FSF_HOMOGENEOUS | nfs3::fs::FSF_CANSETTIME
    );
    assert_consumed(&reply);
}

#[tokio::test]
async fn pathconf_reflects_case_sensitivity() {
    for case_sensitive in [true, false] {
        let server = Nfsd3::new(Arc::new(TestDispatcher::new()), case_sensitive);

        let args = serialize_args(&nfs3::nfs_fh3 { ino: ROOT_ID });
        let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_PATHCONF, &args).await;

        assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3_OK);
        let res =
            xdr::deserialize::<nfs3::fs::PATHCONF3resok>(&mut reply).expect("deserialize resok");
        assert!(matches!(res.obj_attributes, nfs3::post_op_attr::None));
        assert_eq!(res.linkmax, 0);
        assert_eq!(res.name_max, nfs3::NAME_MAX);
        assert!(res.no_trunc);
        assert!(res.chown_restricted);
        assert_eq!(res.case_insensitive, !case_sensitive);
        assert!(res.case_preserving);
    }
}

#[tokio::test]
async fn malformed_getattr_arguments_answer_serverfault() {
    let server = Nfsd3::new(Arc::new(TestDispatcher::new()), true);

    // A truncated handle: length claims 8 bytes, none follow.
    let mut reply = dispatch(
        &server,
        nfs3::NFSProgram::NFSPROC3_GETATTR,
        &8_u32.to_be_bytes(),
    )
    .await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_SERVERFAULT);
    assert_consumed(&reply);
}

#[tokio::test]
async fn malformed_write_arguments_answer_serverfault_with_wcc() {
    let server = Nfsd3::new(Arc::new(TestDispatcher::new()), true);

    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_WRITE, &[0, 1]).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_SERVERFAULT);
    let wcc = xdr::deserialize::<nfs3::wcc_data>(&mut reply).expect("deserialize wcc_data");
    assert!(matches!(wcc.before, nfs3::pre_op_attr::None));
    assert!(matches!(wcc.after, nfs3::post_op_attr::None));
    assert_consumed(&reply);
}

#[tokio::test]
async fn timeouts_surface_as_jukebox() {
    let fs = Arc::new(TestDispatcher {
        statfs_result: Mutex::new(Some(Err(VfsError::Timeout))),
        ..TestDispatcher::new()
    });
    fs.insert_attr(ROOT_ID, dir_stat(ROOT_ID));
    let server = Nfsd3::new(fs, true);

    let args = serialize_args(&nfs3::nfs_fh3 { ino: ROOT_ID });
    let mut reply = dispatch(&server, nfs3::NFSProgram::NFSPROC3_FSSTAT, &args).await;

    assert_eq!(read_status(&mut reply), nfs3::nfsstat3::NFS3ERR_JUKEBOX);
}

#[tokio::test]
async fn every_valid_procedure_emits_an_accept_stat_first() {
    let server = Nfsd3::new(Arc::new(TestDispatcher::new()), true);

    for proc in 0_u32..22 {
        let mut output = Vec::new();
        server
            .dispatch_rpc(7, nfs3::PROGRAM, nfs3::VERSION, proc, &[], &mut output)
            .await
            .expect("dispatch_rpc");

        assert!(output.len() >= 4, "procedure {} produced no accept_stat", proc);
        let mut cursor = Cursor::new(output);
        let accept = read_accept_stat(&mut cursor);
        assert!(
            matches!(accept, accept_stat::SUCCESS | accept_stat::PROC_UNAVAIL),
            "procedure {} replied {:?}",
            proc,
            accept
        );
    }
}
