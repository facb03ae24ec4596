//! Associates keys to commands, per mode

use crate::matrix::Coordinate;

pub const ROWS: usize = 4;
pub const COLS: usize = 3;
pub const MODES: usize = 3;

/// What a key does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Types `command`, then Enter if `auto_enter` is set. Without it the command is left on
    /// the host's prompt to be completed by hand.
    TypeCommand {
        label: &'static str,
        command: &'static str,
        auto_enter: bool,
    },
    SwitchMode,
    Unmapped,
}

/// Command run as soon as it is typed
pub const fn cmd(label: &'static str, command: &'static str) -> Action {
    Action::TypeCommand {
        label,
        command,
        auto_enter: true,
    }
}

/// Command left unfinished for the operator to complete
pub const fn partial(label: &'static str, command: &'static str) -> Action {
    Action::TypeCommand {
        label,
        command,
        auto_enter: false,
    }
}

pub const ___: Action = Action::Unmapped;
pub const SW: Action = Action::SwitchMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode<const ROWS: usize, const COLS: usize> {
    pub name: &'static str,
    pub table: [[Action; COLS]; ROWS],
}

impl<const ROWS: usize, const COLS: usize> Mode<ROWS, COLS> {
    /// The action stored at `at`, [`Action::Unmapped`] for empty or out of range positions
    pub fn resolve(&self, at: Coordinate) -> Action {
        self.table
            .get(at.row as usize)
            .and_then(|row| row.get(at.col as usize))
            .copied()
            .unwrap_or(Action::Unmapped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap<const MODES: usize, const ROWS: usize, const COLS: usize> {
    pub modes: [Mode<ROWS, COLS>; MODES],
    /// Cycles modes, whatever the active mode's table says
    pub switch_key: Coordinate,
}

impl<const MODES: usize, const ROWS: usize, const COLS: usize> Keymap<MODES, ROWS, COLS> {
    pub fn mode(&self, index: usize) -> &Mode<ROWS, COLS> {
        &self.modes[index % MODES]
    }

    pub fn resolve(&self, mode: usize, at: Coordinate) -> Action {
        self.modes
            .get(mode)
            .map_or(Action::Unmapped, |mode| mode.resolve(at))
    }

    /// At least one mode, and in every mode the switch key, and only the switch key, is
    /// [`Action::SwitchMode`]
    pub const fn is_well_formed(&self) -> bool {
        let (switch_row, switch_col) = (self.switch_key.row as usize, self.switch_key.col as usize);
        if MODES == 0 || switch_row >= ROWS || switch_col >= COLS {
            return false;
        }

        let mut m = 0;
        while m < MODES {
            let table = &self.modes[m].table;
            let mut row = 0;
            while row < ROWS {
                let mut col = 0;
                while col < COLS {
                    let is_switch = matches!(table[row][col], Action::SwitchMode);
                    let at_switch_key = row == switch_row && col == switch_col;
                    if is_switch != at_switch_key {
                        return false;
                    }
                    col += 1;
                }
                row += 1;
            }
            m += 1;
        }
        true
    }
}

pub type KubepadKeymap = Keymap<MODES, ROWS, COLS>;

#[rustfmt::skip]
pub const KUBEPAD: KubepadKeymap = Keymap {
    switch_key: Coordinate::new(3, 2),
    modes: [
        Mode { name: "kubectl", table: [
            [cmd("pods", "kubectl get pods -A"),        cmd("nodes", "kubectl get nodes"),            cmd("svc", "kubectl get svc -A")],
            [partial("describe", "kubectl describe pod "), partial("logs", "kubectl logs -f "),      cmd("all", "kubectl get all -A")],
            [cmd("top", "kubectl top nodes"),           cmd("version", "kubectl version"),            cmd("apply", "kubectl apply -f .")],
            [partial("delete", "kubectl delete pod "),  cmd("config", "kubectl config view"),         SW],
        ]},
        Mode { name: "helm", table: [
            [cmd("list", "helm list -A"),               cmd("repos", "helm repo list"),               cmd("update", "helm repo update")],
            [partial("search", "helm search repo "),    partial("install", "helm install "),          partial("upgrade", "helm upgrade --install ")],
            [partial("status", "helm status "),         partial("history", "helm history "),          partial("rollback", "helm rollback ")],
            [partial("uninstall", "helm uninstall "),   ___,                                          SW],
        ]},
        Mode { name: "debug", table: [
            [cmd("events", "kubectl get events -A --sort-by=.lastTimestamp"), cmd("context", "kubectl config current-context"), cmd("clear", "clear")],
            [partial("exec", "kubectl exec -it "),      partial("forward", "kubectl port-forward "),  cmd("failing", "kubectl get pods -A --field-selector=status.phase!=Running")],
            [___,                                       ___,                                          ___],
            [___,                                       ___,                                          SW],
        ]},
    ],
};

const _: () = assert!(KUBEPAD.is_well_formed(), "every mode needs the switch key, once");
