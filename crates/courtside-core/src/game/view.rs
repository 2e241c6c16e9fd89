// View seam: one-way commands from the presenter to whatever draws the screen.

/// A display command emitted by the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    ReloadStartList,
    ReloadBenchList,
    ShowBench,
    ShowTapTip,
    ShowSubstitutionConfirmation { outgoing: String, incoming: String },
    DeselectStartRow(usize),
}

/// Receiver of presenter notifications. Nothing is returned to the
/// presenter.
pub trait GameView {
    fn reload_start_list(&mut self);
    fn reload_bench_list(&mut self);
    /// Reveal the bench so the scorekeeper can pick a replacement.
    fn show_bench(&mut self);
    /// Prompt the scorekeeper to select a player before entering an event.
    fn show_tap_tip(&mut self);
    /// Ask the scorekeeper to confirm `outgoing` leaving for `incoming`.
    fn show_substitution_confirmation(&mut self, outgoing: &str, incoming: &str);
    fn deselect_start_row(&mut self, index: usize);
}

/// A view that records every command it receives, in order.
#[derive(Debug, Default)]
pub struct CommandLog {
    pub commands: Vec<ViewCommand>,
}

impl CommandLog {
    pub fn contains(&self, command: &ViewCommand) -> bool {
        self.commands.contains(command)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl GameView for CommandLog {
    fn reload_start_list(&mut self) {
        self.commands.push(ViewCommand::ReloadStartList);
    }

    fn reload_bench_list(&mut self) {
        self.commands.push(ViewCommand::ReloadBenchList);
    }

    fn show_bench(&mut self) {
        self.commands.push(ViewCommand::ShowBench);
    }

    fn show_tap_tip(&mut self) {
        self.commands.push(ViewCommand::ShowTapTip);
    }

    fn show_substitution_confirmation(&mut self, outgoing: &str, incoming: &str) {
        self.commands.push(ViewCommand::ShowSubstitutionConfirmation {
            outgoing: outgoing.to_string(),
            incoming: incoming.to_string(),
        });
    }

    fn deselect_start_row(&mut self, index: usize) {
        self.commands.push(ViewCommand::DeselectStartRow(index));
    }
}
