use scantool::serial::SerialTransport;
use scantool::Elm327;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port = std::env::args().nth(1).unwrap_or_else(|| "/dev/ttyUSB0".into());
    let transport = SerialTransport::open(&port).unwrap();
    let elm = Elm327::connect(transport).await.unwrap();

    println!("VIN: {}", elm.vin().await);
    println!("RPM: {}", elm.rpm().await.unwrap());
    println!("Coolant: {} °C", elm.coolant_temp().await.unwrap());

    elm.disconnect().await;
}
