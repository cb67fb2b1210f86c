use leptos::prelude::*;
use log::error;

use crate::components::orb_graph::{GraphData, OrbGraphCanvas, SEED_GRAPH};

/// Parse the bundled seed graph, falling back to an empty one.
fn seed_data() -> GraphData {
	serde_json::from_str(SEED_GRAPH).unwrap_or_else(|e| {
		error!("bundled seed graph is invalid: {e}");
		GraphData::default()
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(seed_data);
	let (search, set_search) = signal(String::new());
	let (back, set_back) = signal(0u32);
	let (selected, set_selected) = signal(None::<String>);
	let on_select = Callback::new(move |name: Option<String>| set_selected.set(name));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<OrbGraphCanvas
					data=graph_data
					search=search
					back=back
					on_select=on_select
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Infinite Node Visualizer"</h1>
					<input
						type="text"
						placeholder="Search nodes..."
						prop:value=move || search.get()
						on:input=move |ev| set_search.set(event_target_value(&ev))
					/>
					<button on:click=move |_| set_back.update(|n| *n += 1)>"Back"</button>
				</div>
				<div class="graph-footer">
					<span>
						{move || match selected.get() {
							Some(name) => format!("Selected: {name}"),
							None => "No node selected".to_string(),
						}}
					</span>
					<span class="subtitle">
						"Drag to rotate. Scroll to zoom. Click nodes and highlighted connections to navigate."
					</span>
				</div>
			</div>
		</ErrorBoundary>
	}
}
