use leptos::prelude::*;

use crate::labels::LabelVisibility;

/// Usage hint that doubles as the hub-label switch.
#[component]
pub fn HelpToggle(labels: RwSignal<LabelVisibility>) -> impl IntoView {
	view! {
		<div
			id="help"
			class="graph-help"
			title="Click to show or hide hub labels"
			on:click=move |_| labels.update(LabelVisibility::toggle)
		>
			<p>"Hover a node for details. Drag nodes to reposition."</p>
			<p>
				{move || {
					if labels.get().is_visible() { "Click here to hide labels" } else { "Click here to show labels" }
				}}
			</p>
		</div>
	}
}
