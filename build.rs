use std::{ env, fs::File, io::Write, path::Path };

const CPU_FREQ: Option<&str> = option_env!("CPU_FREQ");
const SERIAL_RATE: Option<&str> = option_env!("SERIAL_RATE");
const RING_BUFFER: Option<&str> = option_env!("RING_BUFFER");

fn main() {
    let out_dir = env::var("OUT_DIR").expect("Environment variable OUT_DIR not defined");
    let dest_path = Path::new(&out_dir).join("constants.rs");
    let mut f = File::create(&dest_path).expect("Could not create \"constants.rs\"");

    let frequency: u64 = match CPU_FREQ {
        Some(freq) => freq.parse().unwrap_or_else(|_| {
            println!("cargo:warning=Unable to parse CPU_FREQ into a u64, defaulting to 8MHz");
            8_000_000
        }),
        None => 8_000_000,
    };

    let rate: u32 = match SERIAL_RATE {
        Some(rate) => rate.parse().expect("SERIAL_RATE must be a positive integer"),
        None => 9600,
    };

    // Only the timing derivation for 8N1 at 9600bps has been validated
    // against real hardware; anything else is refused at build time rather
    // than silently producing a line rate nobody has checked.
    if rate != 9600 {
        panic!("SERIAL_RATE {rate} is not supported; only 9600 has been validated");
    }

    let ring_buffer: Option<usize> = match RING_BUFFER {
        Some(cap) => Some(cap.parse().expect("RING_BUFFER must be a positive integer")),
        None => None,
    };

    writeln!(&mut f, "/// Reflects the CPU_FREQ environment variable (defaults to 8MHz).").unwrap();
    writeln!(&mut f, "pub const CPU_FREQUENCY: u64 = {frequency};").unwrap();
    writeln!(&mut f, "/// Reflects the SERIAL_RATE environment variable. Only 9600 is validated.").unwrap();
    writeln!(&mut f, "pub const SERIAL_RATE: u32 = {rate};").unwrap();

    match ring_buffer {
        Some(cap) => {
            writeln!(&mut f, "/// Receive ring capacity, set via the RING_BUFFER environment variable.").unwrap();
            writeln!(&mut f, "pub const RING_BUFFER: usize = {cap};").unwrap();
            println!("cargo:rustc-cfg=ring_buffer");
        }
        None => {
            writeln!(&mut f, "pub const RING_BUFFER: usize = 0;").unwrap();
        }
    }

    println!("cargo:rustc-check-cfg=cfg(ring_buffer)");
    println!("cargo:rerun-if-env-changed=CPU_FREQ");
    println!("cargo:rerun-if-env-changed=SERIAL_RATE");
    println!("cargo:rerun-if-env-changed=RING_BUFFER");
}
