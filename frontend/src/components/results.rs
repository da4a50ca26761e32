use super::super::Model;
use shared::Label;
use shared::color::{confidence_color, display_confidence, format_percent};
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    let labels = &model.state.labels;

    if labels.is_empty() {
        return if model.state.is_busy() {
            html! {}
        } else {
            html! { <p class="no-results-message">{"No labels yet. Run an analysis to see results."}</p> }
        };
    }

    html! {
        <div class="results-container">
            <h3>{ format!("Detected labels ({})", labels.len()) }</h3>
            <div class="labels-grid">
                { for labels.iter().enumerate().map(|(i, label)| render_label_card(i, label)) }
            </div>
        </div>
    }
}

fn render_label_card(index: usize, label: &Label) -> Html {
    let percentage = display_confidence(label.confidence);
    let color = confidence_color(label.confidence);

    html! {
        <div class="label-card" key={index.to_string()} style={format!("border-top: 6px solid {}", color)}>
            <div class="label-name">{ label.name.clone() }</div>
            <div class="label-confidence">{ format_percent(label.confidence) }</div>
            <div class="confidence-bar-outer">
                <div
                    class="confidence-bar-inner"
                    style={format!("width: {}%; background: {}", percentage, color)}
                ></div>
            </div>
        </div>
    }
}
