//! Navigation workflows driven through the public API
//!
//! These tests verify:
//! - A coordinator tree built from configuration
//! - Push/pop bookkeeping against the mock container
//! - Back gestures reported by the host
//! - Hosts that report visibility synchronously from inside a transition
//! - Lost sync surfacing as a crate error

use anyhow::Result;
use libcoordkit::config::Config;
use libcoordkit::coordinator::navigation::NavigationCoordinator;
use libcoordkit::coordinator::scene::{SceneCoordinator, SceneExt, SceneRef};
use libcoordkit::coordinator::{CoordinatorExt, FlowCoordinator};
use libcoordkit::error::{CoordinatorError, NavigationError};
use libcoordkit::events::CoordinatorEvent;
use libcoordkit::host::mock::{MockPresentable, MockStackContainer, RecordingListener, StackOp};
use libcoordkit::host::{Completion, Presentable, PresentableRef, StackContainer};
use std::cell::{Cell, RefCell};
use std::io::Write;
use std::rc::{Rc, Weak};
use tempfile::NamedTempFile;

fn scene(name: &str) -> SceneRef {
    SceneCoordinator::with_presentable(MockPresentable::new(name))
}

#[test]
fn test_mail_flow_from_config() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(
        br#"
[navigation]
animate_dismissal = false
"#,
    )?;
    let config = Config::load_from_path(&file.path().to_path_buf())?;

    let app = FlowCoordinator::new();
    let container = MockStackContainer::new("mail");
    let navigation = NavigationCoordinator::with_config(container.clone(), config.navigation);
    let inbox = scene("inbox");
    let thread = scene("thread");
    let attachment = scene("attachment");
    let analytics = Rc::new(RecordingListener::new());
    thread.add_listener(&analytics);

    navigation.set_root(&inbox);
    app.start();
    app.start_child(&navigation);
    assert!(inbox.is_active());

    navigation.push(&thread, true);
    navigation.push(&attachment, true);
    assert_eq!(container.visible_names(), vec!["inbox", "thread", "attachment"]);
    assert!(navigation.is_synchronized());
    assert!(inbox.is_paused());
    assert!(thread.is_paused());

    // the attachment viewer closes itself
    attachment.request_dismissal();
    assert_eq!(container.ops().last(), Some(&StackOp::Pop { animated: false }));
    assert!(thread.is_active());
    assert!(attachment.is_inactive());

    let shown = container
        .simulate_back_gesture()
        .expect("container keeps its root");
    navigation.did_show(&shown)?;
    assert_eq!(navigation.depth(), 1);
    assert!(inbox.is_active());
    assert!(navigation.is_synchronized());

    assert_eq!(
        analytics.events(),
        vec![
            CoordinatorEvent::DidStart,
            CoordinatorEvent::DidPause,
            CoordinatorEvent::DidResume,
            CoordinatorEvent::DidStop,
        ]
    );

    app.stop();
    assert!(navigation.is_inactive());
    assert!(inbox.is_inactive());
    assert!(navigation.root().is_none());

    Ok(())
}

#[test]
fn test_pop_to_root_then_reuse_stack() -> Result<()> {
    let container = MockStackContainer::new("settings");
    let root = scene("settings");
    let navigation = NavigationCoordinator::with_root(container.clone(), &root);
    navigation.start();

    let account = scene("account");
    let password = scene("password");
    navigation.push(&account, true);
    navigation.push(&password, true);
    navigation.pop_to_root(true);

    assert_eq!(container.visible_names(), vec!["settings"]);
    assert!(account.is_inactive());
    assert!(password.is_inactive());

    // a popped flow can be pushed again
    navigation.push(&account, true);
    assert!(account.is_active());
    assert_eq!(navigation.depth(), 2);
    assert!(navigation.is_synchronized());

    Ok(())
}

#[test]
fn test_lost_sync_converts_to_crate_error() -> Result<()> {
    let container = MockStackContainer::new("nav");
    let navigation = NavigationCoordinator::with_root(container.clone(), &scene("home"));
    navigation.start();

    let stray: PresentableRef = MockPresentable::new("stray");
    container.simulate_external_push(&stray);

    let result: libcoordkit::Result<()> = navigation.did_show(&stray).map_err(Into::into);
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        CoordinatorError::Navigation(NavigationError::LostSync { drained: 1 })
    ));
    assert!(err.to_string().contains("Lost sync"));

    Ok(())
}

/// Container that reports the visible presentable right after every move,
/// the way a host with animations disabled does.
struct ReportingContainer {
    inner: Rc<MockStackContainer>,
    navigation: RefCell<Weak<NavigationCoordinator>>,
    reports: Cell<usize>,
    failures: Cell<usize>,
}

impl ReportingContainer {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            inner: MockStackContainer::new("reporting"),
            navigation: RefCell::new(Weak::new()),
            reports: Cell::new(0),
            failures: Cell::new(0),
        })
    }

    fn attach(&self, navigation: &Rc<NavigationCoordinator>) {
        *self.navigation.borrow_mut() = Rc::downgrade(navigation);
    }

    fn report(&self) {
        let navigation = self.navigation.borrow().upgrade();
        let (Some(navigation), Some(top)) = (navigation, self.inner.top()) else {
            return;
        };
        self.reports.set(self.reports.get() + 1);
        if navigation.did_show(&top).is_err() || !navigation.is_synchronized() {
            self.failures.set(self.failures.get() + 1);
        }
    }
}

impl Presentable for ReportingContainer {
    fn load(&self) {
        self.inner.load();
    }

    fn present(&self, presented: &PresentableRef, animated: bool, completion: Option<Completion>) {
        self.inner.present(presented, animated, completion);
    }

    fn dismiss(&self, animated: bool, completion: Option<Completion>) {
        self.inner.dismiss(animated, completion);
    }
}

impl StackContainer for ReportingContainer {
    fn set_root(&self, root: &PresentableRef) {
        self.inner.set_root(root);
    }

    fn push(&self, presentable: &PresentableRef, animated: bool, completion: Option<Completion>) {
        self.inner.push(presentable, animated, completion);
        self.report();
    }

    fn pop(&self, animated: bool, completion: Option<Completion>) {
        self.inner.pop(animated, completion);
        self.report();
    }

    fn pop_to(&self, presentable: &PresentableRef, animated: bool) {
        self.inner.pop_to(presentable, animated);
        self.report();
    }

    fn pop_to_root(&self, animated: bool) {
        self.inner.pop_to_root(animated);
        self.report();
    }

    fn set_navigation_bar_hidden(&self, hidden: bool, animated: bool) {
        self.inner.set_navigation_bar_hidden(hidden, animated);
    }
}

#[test]
fn test_synchronous_host_reports_see_consistent_stacks() -> Result<()> {
    let container = ReportingContainer::new();
    let home = scene("home");
    let navigation = NavigationCoordinator::with_root(container.clone(), &home);
    container.attach(&navigation);
    navigation.start();

    let list = scene("list");
    let detail = scene("detail");
    let edit = scene("edit");
    navigation.push(&list, true);
    navigation.push(&detail, true);
    navigation.push(&edit, true);
    navigation.pop(true);
    navigation.pop_to(&list, true);
    navigation.push(&detail, false);
    navigation.pop_to_root(false);

    assert_eq!(container.reports.get(), 7);
    assert_eq!(container.failures.get(), 0);
    assert_eq!(navigation.depth(), 1);
    assert!(home.is_active());
    assert!([&list, &detail, &edit].iter().all(|flow| flow.is_inactive()));

    Ok(())
}

#[test]
fn test_modal_over_navigation_stack() -> Result<()> {
    let container = MockStackContainer::new("nav");
    let home = scene("home");
    let navigation = NavigationCoordinator::with_root(container.clone(), &home);
    navigation.start();

    // a pushed scene presents its own modal child
    let detail = SceneCoordinator::with_presentable(MockPresentable::new("detail"));
    let detail_ref: SceneRef = detail.clone();
    navigation.push(&detail_ref, true);

    let share = scene("share");
    detail.start_scene(&share, true, None);
    assert!(share.is_active());
    assert_eq!(container.visible_names(), vec!["home", "detail"]);

    navigation.pop(true);
    assert!(share.is_inactive());
    assert!(detail.is_inactive());

    Ok(())
}
