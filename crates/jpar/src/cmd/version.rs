use jpar_archive::FRAMING_VERSION;
use jpar_segment::{MAX_SEGMENT_PAYLOAD, SIGNATURE};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("jpar {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: jpar");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target: {}", option_env!("JPAR_BUILD_TARGET").unwrap_or("unknown"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "rustc: {}",
        option_env!("RUSTC_VERSION").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("framing_version: {FRAMING_VERSION}");
    println!(
        "segment_signature: {}",
        String::from_utf8_lossy(&SIGNATURE[..SIGNATURE.len() - 1])
    );
    println!("max_segment_payload: {MAX_SEGMENT_PAYLOAD}");

    Ok(SUCCESS)
}
