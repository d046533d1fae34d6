use scantool::monitor::VehicleSnapshot;
use scantool::serial::SerialTransport;
use scantool::{Elm327, StreamExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port = std::env::args().nth(1).unwrap_or_else(|| "/dev/ttyUSB0".into());
    let transport = SerialTransport::open(&port).unwrap();
    let elm = Elm327::connect(transport).await.unwrap();

    let monitor = elm.monitor();
    let mut snapshots = monitor.snapshots();
    monitor.set_logging(true);
    monitor.start();

    for _ in 0..10 {
        if let Some(snapshot) = snapshots.next().await {
            println!(
                "{:5.0} rpm  {:3.0} km/h  coolant {:3.0} C  intake {:3.0} C  maf {:5.2} g/s  throttle {:5.1} %",
                snapshot.rpm,
                snapshot.speed,
                snapshot.coolant_temp,
                snapshot.intake_temp,
                snapshot.maf,
                snapshot.throttle
            );
        }
    }

    monitor.stop().await;
    println!("{}", monitor.export_csv(&VehicleSnapshot::NAMES));

    elm.disconnect().await;
}
