#![cfg(any(loom, kindle_loom))]
//! 生命周期控制器的 Loom 并发模型。
//!
//! 运行方式：`RUSTFLAGS="--cfg kindle_loom" cargo test -p kindle-core --features loom-model --test loom_lifecycle`。

use kindle_core::test_stubs::RecordingHooks;
use kindle_core::{BareMetal, Hosted, LifecycleController, LifecycleOutcome, LifecycleState};
use loom::{model, sync::Arc, thread};

#[test]
fn racing_startups_construct_exactly_once() {
    //
    // 教案级说明：
    // - **Why**：并发嵌入方同时调用 `startup` 时，“先检查后设置”会重复初始化；
    // - **How**：两个线程同时启动，Loom 穷举比较交换与状态发布的全部交错；
    // - **What**：无论交错如何，构造恰好一次、最终为 `Running`，且两个结果中恰有一个 `Started`。
    model(|| {
        let controller: Arc<LifecycleController<RecordingHooks, Hosted>> =
            Arc::new(LifecycleController::new(RecordingHooks::new()));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let controller = Arc::clone(&controller);
                thread::spawn(move || controller.startup())
            })
            .collect();
        let outcomes: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("启动线程不应 panic"))
            .collect();

        assert_eq!(controller.hooks().constructions(), 1, "构造必须恰好一次");
        assert_eq!(controller.state(), LifecycleState::Running);
        assert_eq!(
            outcomes
                .iter()
                .filter(|outcome| **outcome == LifecycleOutcome::Started)
                .count(),
            1
        );
    });
}

#[test]
fn startup_racing_shutdown_stays_symmetric() {
    //
    // 教案级说明：启动与关闭交错时，析构次数永远不超过构造次数，且最终状态只能是稳定态。
    model(|| {
        let controller: Arc<LifecycleController<RecordingHooks, Hosted>> =
            Arc::new(LifecycleController::new(RecordingHooks::new()));

        let starter = {
            let controller = Arc::clone(&controller);
            thread::spawn(move || controller.startup())
        };
        let stopper = {
            let controller = Arc::clone(&controller);
            thread::spawn(move || controller.shutdown())
        };
        starter.join().expect("启动线程不应 panic");
        let stop = stopper.join().expect("关闭线程不应 panic");

        let hooks = controller.hooks();
        assert_eq!(hooks.constructions(), 1);
        match stop {
            LifecycleOutcome::Stopped => {
                assert_eq!(hooks.destructions(), 1);
                assert_eq!(controller.state(), LifecycleState::Stopped);
            }
            LifecycleOutcome::AlreadyStopped => {
                assert_eq!(hooks.destructions(), 0);
                assert_eq!(controller.state(), LifecycleState::Running);
            }
            other => panic!("宿主档位下关闭不应返回 {other:?}"),
        }
    });
}

#[test]
fn bare_metal_contention_never_double_constructs() {
    //
    // 教案级说明：裸机档位不等待过渡，失败者可能得到 `InTransition`，但构造依然只执行一次。
    model(|| {
        let controller: Arc<LifecycleController<RecordingHooks, BareMetal>> =
            Arc::new(LifecycleController::new(RecordingHooks::new()));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let controller = Arc::clone(&controller);
                thread::spawn(move || controller.startup())
            })
            .collect();
        for handle in handles {
            let outcome = handle.join().expect("启动线程不应 panic");
            assert!(matches!(
                outcome,
                LifecycleOutcome::Started
                    | LifecycleOutcome::AlreadyRunning
                    | LifecycleOutcome::InTransition
            ));
        }

        assert_eq!(controller.hooks().constructions(), 1);
        assert_eq!(controller.state(), LifecycleState::Running);
    });
}
