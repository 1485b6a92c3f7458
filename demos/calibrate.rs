//! Calibrate a magnetometer from a recorded sample file
//!
//! ```text
//! cargo run --example calibrate -- samples.txt [compensated.csv]
//! ```
//!
//! Prints the configuration record values and optionally writes raw and
//! compensated samples side by side for plotting.

use std::error::Error;

use magcal_ellipsoid::CalibrationSession;
use serde::Serialize;

#[derive(Serialize)]
struct Row {
    raw_x: f64,
    raw_y: f64,
    raw_z: f64,
    x: f64,
    y: f64,
    z: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("usage: calibrate <samples.txt> [compensated.csv]");
        std::process::exit(2);
    };

    let mut session = CalibrationSession::new();
    session.load_from_text(&input)?;

    let result = session.get_or_compute()?;
    let radii = result.radii();
    println!(
        "radii: {:.3} {:.3} {:.3} (field strength {:.3})",
        radii.x,
        radii.y,
        radii.z,
        result.field_strength()
    );

    let config = result.to_config();
    println!("mag_cal_cx = {}", config.cx);
    println!("mag_cal_cy = {}", config.cy);
    println!("mag_cal_cz = {}", config.cz);
    println!("mag_cal_xx = {}  mag_cal_xy = {}  mag_cal_xz = {}", config.xx, config.xy, config.xz);
    println!("mag_cal_yx = {}  mag_cal_yy = {}  mag_cal_yz = {}", config.yx, config.yy, config.yz);
    println!("mag_cal_zx = {}  mag_cal_zy = {}  mag_cal_zz = {}", config.zx, config.zy, config.zz);

    if let Some(output) = args.next() {
        let compensated = session.compensated_samples().unwrap_or_default();
        let mut writer = csv::Writer::from_path(&output)?;
        for (raw, cal) in session.samples().iter().zip(&compensated) {
            writer.serialize(Row {
                raw_x: raw.x,
                raw_y: raw.y,
                raw_z: raw.z,
                x: cal.x,
                y: cal.y,
                z: cal.z,
            })?;
        }
        writer.flush()?;
        log::info!("wrote {} rows to {}", compensated.len(), output);
    }

    Ok(())
}
