use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ModalHostProps {
    #[prop_or_default]
    pub children: Html,
}

/// Helper component to attach the contents into the document.body instead of in the place where it's used.
#[function_component]
pub(crate) fn ModalHost(props: &ModalHostProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(props.children.clone(), modal_host.into())
}
