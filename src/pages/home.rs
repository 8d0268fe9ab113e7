use leptos::prelude::*;
use leptos_router::hooks::use_location;
use log::{error, info};

use crate::components::force_graph::ForceGraphCanvas;
use crate::components::help::HelpToggle;
use crate::labels::LabelVisibility;
use crate::loader::{LoadError, fetch_document};
use crate::query::{DEFAULT_DATA_FILE, QueryParams};

/// A failed load ends the session: tell the user right away.
fn report_load_failure(err: &LoadError) {
	error!("{err}");
	if let Some(window) = web_sys::window() {
		let _ = window.alert_with_message(&err.to_string());
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let query = QueryParams::parse(&use_location().search.get_untracked());
	let file = query.resolve_data_file(DEFAULT_DATA_FILE).to_owned();
	info!("loading graph from {file} (query: {:?})", query.params);

	let labels = RwSignal::new(LabelVisibility::default());
	let fetch_file = file.clone();
	let document = LocalResource::new(move || fetch_document(fetch_file.clone()));

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
				<p>"Reload the page to try again."</p>
			}
		}>

			<div class="fullscreen-graph">
				<Suspense fallback=|| view! { <p class="graph-loading">"Loading graph..."</p> }>
					{
						let file = file.clone();
						move || {
							let file = file.clone();
							Suspend::new(async move {
								let doc = document.await.inspect_err(report_load_failure)?;
								let data = Signal::derive(move || doc.clone());
								Ok::<_, LoadError>(
									view! {
										<ForceGraphCanvas
											data=data
											dataset=file
											labels=labels
											fullscreen=true
										/>
									},
								)
							})
						}
					}
				</Suspense>
				<div class="graph-overlay">
					<h1>"Force-Directed Graph"</h1>
					<HelpToggle labels=labels />
				</div>
			</div>
		</ErrorBoundary>
	}
}
