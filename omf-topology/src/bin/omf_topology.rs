use clap::Parser;
use omf_topology::app::OmfApp;

fn main() {
    env_logger::init();
    let args = OmfApp::parse();
    match args.op.run() {
        Ok(report) => {
            log::info!("finished. {report}");
        }
        Err(e) => {
            log::error!("omf_topology failed: {e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
