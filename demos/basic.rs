use serde_json::json;
use synced_json::SyncedDict;

fn main() -> Result<(), synced_json::Error> {
    env_logger::init();

    let path = std::env::temp_dir().join("synced_json_demo_basic.json");
    let _ = std::fs::remove_file(&path);

    // durable mode: every write goes temp-file-then-rename
    let doc = SyncedDict::open(&path, true)?;

    // every mutation lands on disk immediately
    doc.insert("apples", 3)?;
    doc.insert("tags", json!(["fruit", "fresh"]))?;
    println!("apples = {:?}", doc.get("apples")?);
    println!("file   = {}", std::fs::read_to_string(&path).unwrap());

    // mutating a nested value rewrites the root document
    doc.list("tags")?.push("cheap")?;
    println!("file   = {}", std::fs::read_to_string(&path).unwrap());

    // a second collection over the same file sees the committed state
    let other = SyncedDict::open(&path, true)?;
    other.reload()?;
    println!("other  = {:?}", other.to_base()?);

    // legacy key coercion: 0 is stored as "0" (with a deprecation warning,
    // run with RUST_LOG=warn to see it)
    doc.insert(0, "zero")?;
    println!("\"0\"    = {:?}", doc.get("0")?);

    let _ = std::fs::remove_file(&path);
    Ok(())
}
