use crate::{AppState, DisplayState, Effect, Msg, Placement, PreviewLookup};

/// Pure update function: applies a message to state and returns any effects.
///
/// `previews` is the live preview map of the currently bound session; it is
/// only consulted when the pointer enters a link.
pub fn update(
    mut state: AppState,
    msg: Msg,
    previews: &dyn PreviewLookup,
) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Bootstrapped { location } => {
            if state.is_bootstrapped() {
                return (state, Vec::new());
            }
            // The front page is a link hub with no article body to scan.
            let scan = location != state.site_root();
            state.mark_bootstrapped(location.clone());
            let mut effects = vec![Effect::MountPreview];
            if scan {
                let epoch = state.next_epoch();
                effects.push(Effect::ActivatePage { epoch, location });
            }
            effects
        }
        Msg::LocationPolled { location } => {
            if !state.is_bootstrapped() || state.observed_location() == Some(location.as_str()) {
                return (state, Vec::new());
            }
            state.observe_location(location.clone());
            let epoch = state.next_epoch();
            vec![Effect::ActivatePage { epoch, location }]
        }
        Msg::PointerEntered {
            url,
            pointer,
            viewport,
        } => {
            let markup = previews
                .preview_markup(&url)
                .filter(|markup| !markup.is_empty())
                .map(str::to_string);
            match markup {
                Some(markup) => {
                    let placement = Placement::for_pointer(pointer, viewport);
                    state.set_display(DisplayState::Shown {
                        url,
                        markup: markup.clone(),
                        placement,
                    });
                    vec![Effect::ShowPreview { markup, placement }]
                }
                None => Vec::new(),
            }
        }
        Msg::PointerLeft { .. } | Msg::LinkActivated { .. } => {
            if matches!(state.display(), DisplayState::Hidden) {
                return (state, Vec::new());
            }
            state.set_display(DisplayState::Hidden);
            vec![Effect::HidePreview]
        }
    };

    (state, effects)
}
