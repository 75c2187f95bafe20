use panic_handler::Disposition;

fn main() {
    let _handler = panic_handler::PanicHandler::attach(Box::new(
        |info: &std::panic::PanicHookInfo<'_>| {
            println!("Caught panic: {}", info);

            if std::env::args().any(|a| a == "--delegate") {
                Disposition::Delegate
            } else {
                Disposition::Handled
            }
        },
    ))
    .unwrap();

    if std::env::args().any(|a| a == "--panic") {
        panic!("the demo was asked to panic");
    }
}
