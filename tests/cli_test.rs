use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command; // Run programs
use tempfile;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const SAM: &str = "I am Sam. Sam I am.\r\nI do not like this Sam I am.\r\n";

// Write a file into the temporary directory and return its path.
fn put_file(temp_dir: &tempfile::TempDir,name: &str,dat: &[u8]) -> Result<PathBuf,Box<dyn std::error::Error>> {
    let path = temp_dir.path().join(name);
    std::fs::write(&path,dat)?;
    Ok(path)
}

// Run a subcommand from `in_path` to `out_path`, expecting success.
fn run_ok(subcommand: &str,in_path: &PathBuf,out_path: &PathBuf) -> STDRESULT {
    let mut cmd = Command::cargo_bin("huffpress")?;
    cmd.arg(subcommand)
        .arg("-i").arg(in_path)
        .arg("-o").arg(out_path)
        .assert()
        .success();
    Ok(())
}

#[test]
fn compress_and_expand() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"sam.txt",SAM.as_bytes())?;
    let huf_path = temp_dir.path().join("sam.huf");
    let out_path = temp_dir.path().join("sam_expanded.txt");
    run_ok("compress",&in_path,&huf_path)?;
    let huf = std::fs::read(&huf_path)?;
    assert_eq!(huf[0..4],[b'H',b'U',b'F',1]);
    run_ok("expand",&huf_path,&out_path)?;
    assert_eq!(std::fs::read(&out_path)?,SAM.as_bytes());
    Ok(())
}

#[test]
fn decompress_alias() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"bin.dat",&[0,1,2,3,255,255,0])?;
    let huf_path = temp_dir.path().join("bin.huf");
    let out_path = temp_dir.path().join("bin.out");
    run_ok("compress",&in_path,&huf_path)?;
    run_ok("decompress",&huf_path,&out_path)?;
    assert_eq!(std::fs::read(&out_path)?,vec![0,1,2,3,255,255,0]);
    Ok(())
}

#[test]
fn empty_file() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"empty.txt",&[])?;
    let huf_path = temp_dir.path().join("empty.huf");
    let out_path = temp_dir.path().join("empty.out");
    run_ok("compress",&in_path,&huf_path)?;
    run_ok("expand",&huf_path,&out_path)?;
    assert_eq!(std::fs::read(&out_path)?.len(),0);
    Ok(())
}

#[test]
fn truncated_file_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"sam.txt",SAM.as_bytes())?;
    let huf_path = temp_dir.path().join("sam.huf");
    run_ok("compress",&in_path,&huf_path)?;
    let huf = std::fs::read(&huf_path)?;
    let cut_path = put_file(&temp_dir,"cut.huf",&huf[0..huf.len()-1])?;
    let out_path = temp_dir.path().join("cut.txt");
    let mut cmd = Command::cargo_bin("huffpress")?;
    cmd.arg("expand")
        .arg("-i").arg(&cut_path)
        .arg("-o").arg(&out_path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("truncated stream"));
    assert!(!out_path.exists());
    Ok(())
}

#[test]
fn foreign_file_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"sam.txt",SAM.as_bytes())?;
    let out_path = temp_dir.path().join("sam.out");
    let mut cmd = Command::cargo_bin("huffpress")?;
    cmd.arg("expand")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&out_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported format"));
    Ok(())
}

#[test]
fn zip_conversions() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"sam.txt",SAM.as_bytes())?;
    let huf_path = temp_dir.path().join("sam.huf");
    let zip_path = temp_dir.path().join("sam.zip");
    let huf_back_path = temp_dir.path().join("sam_back.huf");
    let txt_path = temp_dir.path().join("sam_back.txt");
    let txt2_path = temp_dir.path().join("sam_direct.txt");
    run_ok("compress",&in_path,&huf_path)?;
    run_ok("huf2zip",&huf_path,&zip_path)?;
    run_ok("zip2huf",&zip_path,&huf_back_path)?;
    assert_eq!(std::fs::read(&huf_path)?,std::fs::read(&huf_back_path)?);
    run_ok("zip2txt",&zip_path,&txt_path)?;
    assert_eq!(std::fs::read(&txt_path)?,SAM.as_bytes());
    run_ok("huf2txt",&huf_path,&txt2_path)?;
    assert_eq!(std::fs::read(&txt2_path)?,SAM.as_bytes());
    Ok(())
}

#[test]
fn text_zip_conversions() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"sam.txt",SAM.as_bytes())?;
    let zip_path = temp_dir.path().join("sam.zip");
    let out_path = temp_dir.path().join("sam_back.txt");
    run_ok("txt2zip",&in_path,&zip_path)?;
    run_ok("unzip-txt",&zip_path,&out_path)?;
    assert_eq!(std::fs::read(&out_path)?,SAM.as_bytes());
    // no .huf entry in a text archive
    let mut cmd = Command::cargo_bin("huffpress")?;
    cmd.arg("zip2huf")
        .arg("-i").arg(&zip_path)
        .arg("-o").arg(temp_dir.path().join("none.huf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no matching entry"));
    Ok(())
}

#[test]
fn overwrite_needs_consent() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = put_file(&temp_dir,"sam.txt",SAM.as_bytes())?;
    let out_path = put_file(&temp_dir,"sam.huf","keep me".as_bytes())?;
    let mut cmd = assert_cmd::Command::cargo_bin("huffpress")?;
    cmd.arg("compress")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&out_path)
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("abort operation"));
    assert_eq!(std::fs::read(&out_path)?,"keep me".as_bytes());
    let mut cmd = Command::cargo_bin("huffpress")?;
    cmd.arg("compress")
        .arg("-f")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&out_path)
        .assert()
        .success();
    assert_ne!(std::fs::read(&out_path)?,"keep me".as_bytes());
    Ok(())
}
