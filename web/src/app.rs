use gloo::timers::callback::Timeout;
use velha_core as game;
use velha_protocol::{ClientMessage, ServerMessage};
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use crate::socket::{Socket, SocketEvent, page_socket_url};
use crate::utils::ModalHost;

/// Fixed reconnect delay; the sole retry policy, unbounded.
const RECONNECT_DELAY_MS: u32 = 3_000;
/// Delay before the automatic opening move request when the opponent starts.
const OPPONENT_OPENING_DELAY_MS: u32 = 1_000;
/// Stagger between showing our own echoed move and the opponent's reply.
const OPPONENT_REVEAL_DELAY_MS: u32 = 600;
/// Delay between the endgame status flip and the summary modal.
const MODAL_DELAY_MS: u32 = 1_000;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Channel(SocketEvent),
    Reconnect,
    SymbolChosen(game::Mark),
    StartGame,
    CellClicked(game::Coord2),
    ResetGame,
    CloseModal,
    ChatSubmit,
    OpponentMoveDue,
    RevealOpponentReply(String),
    ShowModal,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ModalContent {
    pub icon: &'static str,
    pub title: &'static str,
    pub message: &'static str,
}

/// Endgame summary keyed on `(outcome, own mark)`: own win is celebratory,
/// own loss commiserates, a draw is neutral either way.
pub(crate) fn modal_content(
    outcome: game::Outcome,
    identity: Option<game::PlayerIdentity>,
) -> ModalContent {
    use game::Outcome::*;

    match (outcome, identity) {
        (Win(winner), Some(identity)) if winner == identity.player() => ModalContent {
            icon: "🎉",
            title: "You win!",
            message: "Congratulations, the board is yours.",
        },
        (Win(_), Some(_)) => ModalContent {
            icon: "😔",
            title: "You lost",
            message: "The opponent got the better of this one.",
        },
        (Draw, _) => ModalContent {
            icon: "🤝",
            title: "Draw!",
            message: "Nobody takes this round.",
        },
        (Win(_), None) | (InProgress, _) => ModalContent {
            icon: "🏁",
            title: "Game Over",
            message: "This round has ended.",
        },
    }
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: game::Coord,
    col: game::Coord,
    cell: game::Cell,
    #[prop_or_default]
    disabled: bool,
    #[prop_or_default]
    winning: bool,
    callback: Callback<game::Coord2>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        row,
        col,
        cell,
        disabled,
        winning,
        callback,
    } = props.clone();

    let mut class = classes!("cell");
    if disabled {
        class.push("disabled");
    }
    if winning {
        class.push("winning");
    }

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("({}, {}) clicked", row, col);
        callback.emit((row, col));
    });

    html! {
        <td {class} data-row={row.to_string()} data-col={col.to_string()} {onclick}>
            { cell.mark().map(game::Mark::as_str).unwrap_or("") }
        </td>
    }
}

pub(crate) struct GameView {
    session: game::Session,
    transcript: game::Transcript,
    chosen_symbol: game::Mark,
    status: String,
    connected: bool,
    modal: Option<ModalContent>,
    socket: Option<Socket>,
    chat_input: NodeRef,
    reconnect_timer: Option<Timeout>,
    opening_timer: Option<Timeout>,
    reveal_timer: Option<Timeout>,
    modal_timer: Option<Timeout>,
}

impl GameView {
    fn open_socket(ctx: &Context<Self>) -> Option<Socket> {
        let events = ctx.link().callback(Msg::Channel);
        match Socket::open(&page_socket_url(), events) {
            Ok(socket) => Some(socket),
            Err(err) => {
                log::error!("could not open channel: {:?}", err);
                None
            }
        }
    }

    fn retry_timer(link: &Scope<Self>) -> Timeout {
        let link = link.clone();
        Timeout::new(RECONNECT_DELAY_MS, move || link.send_message(Msg::Reconnect))
    }

    fn send(&self, msg: ClientMessage) {
        match &self.socket {
            Some(socket) => socket.send(&msg),
            None => log::debug!("no channel; dropping {:?}", msg),
        }
    }

    /// Runs one snapshot through the session and reacts to the result:
    /// status refresh always, modal scheduling when the game just ended.
    fn apply_snapshot_text(&mut self, link: &Scope<Self>, text: &str) {
        match self.session.apply_snapshot(text) {
            game::SnapshotOutcome::Finished(outcome) => {
                log::debug!("game finished: {:?}", outcome);
                self.status = self.session.status_line();
                let link = link.clone();
                self.modal_timer = Some(Timeout::new(MODAL_DELAY_MS, move || {
                    link.send_message(Msg::ShowModal)
                }));
            }
            game::SnapshotOutcome::Updated => {
                self.status = self.session.status_line();
            }
        }
    }

    fn handle_server_message(&mut self, link: &Scope<Self>, msg: ServerMessage) -> bool {
        match msg {
            ServerMessage::StartGame { status } => {
                self.session.fresh_board();
                self.status = status.unwrap_or_else(|| self.session.status_line());
                true
            }
            ServerMessage::ResetGame { status, .. } => {
                self.session.fresh_board();
                self.status = status.unwrap_or_else(|| self.session.status_line());
                true
            }
            ServerMessage::MakeMove { result, ai_result } => {
                if let Some(result) = result {
                    self.apply_snapshot_text(link, &result);
                }
                // Stagger the opponent's reply so the two moves appear in
                // sequence, unless the game already ended on our own move.
                // A reply landing inside the stagger window replaces the
                // pending one unparsed; snapshots carry full state, so the
                // latest reply alone yields the correct board.
                if let Some(ai_result) = ai_result {
                    if !self.session.phase().is_game_over() {
                        let link = link.clone();
                        self.reveal_timer = Some(Timeout::new(OPPONENT_REVEAL_DELAY_MS, move || {
                            link.send_message(Msg::RevealOpponentReply(ai_result))
                        }));
                    }
                }
                true
            }
            ServerMessage::AiMove { result } => {
                if let Some(result) = result {
                    self.apply_snapshot_text(link, &result);
                }
                true
            }
            ServerMessage::GetBoard { board_state } => {
                if let Some(board_state) = board_state {
                    self.apply_snapshot_text(link, &board_state);
                }
                true
            }
            ServerMessage::Chat { reply } => {
                if let Some(reply) = reply {
                    self.transcript.push_remote(reply);
                }
                true
            }
            ServerMessage::Unknown => {
                log::debug!("ignoring message with unknown action");
                false
            }
        }
    }

    /// Drops every pending game timer. Stale delayed parses from a
    /// previous game must never touch a fresh one.
    fn cancel_game_timers(&mut self) {
        self.opening_timer = None;
        self.reveal_timer = None;
        self.modal_timer = None;
    }

    fn view_setup_card(&self, ctx: &Context<Self>) -> Html {
        let chosen = self.chosen_symbol;
        let symbol_button = |mark: game::Mark| {
            let class = classes!("symbol", (chosen == mark).then_some("selected"));
            let onclick = ctx.link().callback(move |_| Msg::SymbolChosen(mark));
            html! {
                <button {class} {onclick}>{ mark.as_str() }</button>
            }
        };

        html! {
            <section class="setup">
                <h2>{"New game"}</h2>
                <div class="symbols">
                    { symbol_button(game::Mark::X) }
                    { symbol_button(game::Mark::O) }
                </div>
                <button class="start" onclick={ctx.link().callback(|_| Msg::StartGame)}>
                    {"Start game"}
                </button>
            </section>
        }
    }

    fn view_status_card(&self, ctx: &Context<Self>) -> Html {
        let phase = self.session.phase();
        let identity = self.session.identity();

        let indicator = |label: &str, mark: Option<game::Mark>, active: bool| {
            let class = classes!("turn", active.then_some("active"));
            let symbol = mark.map(game::Mark::as_str).unwrap_or("?");
            html! {
                <span {class}>{ format!("{} ({})", label, symbol) }</span>
            }
        };

        html! {
            <section class="status">
                <p id="game-status">{ &self.status }</p>
                if !self.connected {
                    <p class="advisory">{"Reconnecting..."}</p>
                }
                <div class="indicators">
                    { indicator(
                        "You",
                        identity.map(|id| id.player()),
                        matches!(phase, game::Phase::AwaitingPlayerMove),
                    ) }
                    { indicator(
                        "Opponent",
                        identity.map(|id| id.opponent()),
                        matches!(phase, game::Phase::AwaitingOpponentMove),
                    ) }
                </div>
                <button class="reset" onclick={ctx.link().callback(|_| Msg::ResetGame)}>
                    {"New game"}
                </button>
            </section>
        }
    }

    fn view_grid(&self, ctx: &Context<Self>) -> Html {
        let board = self.session.board();
        let accepts_input = self.session.phase().accepts_board_input();
        let winning = self.session.winning_cells();

        html! {
            <table id="board">
                {
                    for (0..game::SIDE).map(|row| html! {
                        <tr>
                            {
                                for (0..game::SIDE).map(|col| {
                                    let pos = (row, col);
                                    let cell = board.cell_at(pos);
                                    let disabled = !accepts_input || !cell.is_empty();
                                    let is_winning = winning.contains(&pos);
                                    let callback = ctx.link().callback(Msg::CellClicked);
                                    html! {
                                        <CellView
                                            {row}
                                            {col}
                                            {cell}
                                            {disabled}
                                            winning={is_winning}
                                            {callback}
                                        />
                                    }
                                })
                            }
                        </tr>
                    })
                }
            </table>
        }
    }

    fn view_chat(&self, ctx: &Context<Self>) -> Html {
        let onkeydown = ctx
            .link()
            .batch_callback(|e: KeyboardEvent| (e.key() == "Enter").then_some(Msg::ChatSubmit));

        html! {
            <section class="chat">
                <div id="chat-messages">
                    {
                        for self.transcript.entries().iter().map(|entry| {
                            let class = classes!(
                                "message",
                                match entry.origin {
                                    game::Origin::Local => "local",
                                    game::Origin::Remote => "remote",
                                }
                            );
                            html! { <div {class}>{ &entry.text }</div> }
                        })
                    }
                </div>
                <input
                    id="chat-input"
                    ref={self.chat_input.clone()}
                    placeholder="Talk to your opponent"
                    {onkeydown}
                />
                <button onclick={ctx.link().callback(|_| Msg::ChatSubmit)}>{"Send"}</button>
            </section>
        }
    }

    fn view_modal(&self, ctx: &Context<Self>) -> Html {
        let Some(content) = &self.modal else {
            return Html::default();
        };

        html! {
            <ModalHost>
                <dialog class="endgame" open={true}>
                    <article>
                        <span class="icon">{ content.icon }</span>
                        <h2>{ content.title }</h2>
                        <p>{ content.message }</p>
                        <footer>
                            <button onclick={ctx.link().callback(|_| Msg::ResetGame)}>
                                {"Play again"}
                            </button>
                            <button onclick={ctx.link().callback(|_| Msg::CloseModal)}>
                                {"Close"}
                            </button>
                        </footer>
                    </article>
                </dialog>
            </ModalHost>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let session = game::Session::new();
        let status = session.status_line();
        let socket = Self::open_socket(ctx);
        let reconnect_timer = socket.is_none().then(|| Self::retry_timer(ctx.link()));
        Self {
            session,
            transcript: game::Transcript::new(),
            chosen_symbol: game::Mark::X,
            status,
            connected: false,
            modal: None,
            socket,
            chat_input: NodeRef::default(),
            reconnect_timer,
            opening_timer: None,
            reveal_timer: None,
            modal_timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Channel(SocketEvent::Opened) => {
                self.connected = true;
                // Resync from the authoritative peer after every (re)open.
                self.send(ClientMessage::GetBoard);
                true
            }
            Channel(SocketEvent::Closed) => {
                self.connected = false;
                // One slot: a replaced handle cancels, so exactly one
                // attempt is ever pending.
                self.reconnect_timer = Some(Self::retry_timer(ctx.link()));
                true
            }
            Channel(SocketEvent::Message(msg)) => {
                let link = ctx.link().clone();
                self.handle_server_message(&link, msg)
            }
            Reconnect => {
                self.reconnect_timer = None;
                log::info!("reconnecting");
                self.socket = Self::open_socket(ctx);
                // An open that fails outright never fires a close event,
                // so the retry loop must rearm itself here.
                if self.socket.is_none() {
                    self.reconnect_timer = Some(Self::retry_timer(ctx.link()));
                }
                false
            }
            SymbolChosen(mark) => {
                if self.chosen_symbol != mark {
                    self.chosen_symbol = mark;
                    true
                } else {
                    false
                }
            }
            StartGame => {
                if !self.session.phase().is_setup() {
                    return false;
                }

                self.cancel_game_timers();
                self.modal = None;
                self.send(ClientMessage::StartGame {
                    player_symbol: self.chosen_symbol.as_str().to_string(),
                });

                if self.session.start(self.chosen_symbol) == game::StartEffect::AwaitOpponent {
                    let link = ctx.link().clone();
                    self.opening_timer = Some(Timeout::new(OPPONENT_OPENING_DELAY_MS, move || {
                        link.send_message(Msg::OpponentMoveDue)
                    }));
                }

                self.status = self.session.status_line();
                true
            }
            OpponentMoveDue => {
                self.opening_timer = None;
                self.send(ClientMessage::AiMove);
                false
            }
            CellClicked(pos) => match self.session.click(pos) {
                game::ClickOutcome::Ignored => false,
                game::ClickOutcome::SendMove((row, col)) => {
                    self.send(ClientMessage::MakeMove { row, col });
                    false
                }
            },
            RevealOpponentReply(text) => {
                self.reveal_timer = None;
                let link = ctx.link().clone();
                self.apply_snapshot_text(&link, &text);
                true
            }
            ShowModal => {
                self.modal_timer = None;
                self.modal = Some(modal_content(
                    self.session.outcome(),
                    self.session.identity(),
                ));
                true
            }
            CloseModal => {
                self.modal.take().is_some()
            }
            ResetGame => {
                // The peer is told regardless of local phase; a drop while
                // disconnected is accepted as lost.
                self.send(ClientMessage::ResetGame);
                self.cancel_game_timers();
                self.modal = None;
                self.session.reset();
                self.status = self.session.status_line();
                true
            }
            ChatSubmit => {
                if !self.session.started() {
                    return false;
                }
                let Some(input) = self.chat_input.cast::<HtmlInputElement>() else {
                    return false;
                };

                match self.transcript.push_local(&input.value()) {
                    Some(message) => {
                        input.set_value("");
                        self.send(ClientMessage::Chat { message });
                        true
                    }
                    None => false,
                }
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="velha">
                if self.session.phase().is_setup() {
                    { self.view_setup_card(ctx) }
                } else {
                    { self.view_status_card(ctx) }
                }
                { self.view_grid(ctx) }
                { self.view_chat(ctx) }
                { self.view_modal(ctx) }
            </div>
        }
    }
}
