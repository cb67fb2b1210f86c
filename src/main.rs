use leptos::prelude::*;
use node_orb::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App)
}
