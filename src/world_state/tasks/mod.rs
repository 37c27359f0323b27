//! # Task Management System
//!
//! A worker-pool task system for dispatching chunk population off the owner
//! thread. Generation is a pure function of (seed, coordinate), so it can
//! run anywhere; everything that mutates the shared chunk collections stays
//! serialized on the owner thread, which processes completed results.
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to worker channels using round-robin
//! 3. Workers process tasks and send results back
//! 4. `process_completed_tasks()` applies results on the owner thread; a
//!    result may spawn follow-up tasks

pub mod chunk_generation_task;

use log::info;
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::WorldState;

/// A unit of work that runs on a worker thread.
///
/// Tasks own all the data they need; they must not reach into the shared
/// chunk collections, which belong to the owner thread.
pub trait Task: Send {
    /// Performs the work and returns a result for the owner thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The result of a completed task, applied on the owner thread.
pub trait TaskResult: Send {
    /// Applies the result to the world and returns any follow-up tasks.
    ///
    /// This is the single serialized hand-off point between worker output
    /// and the shared chunk collections.
    fn handle_result(self: Box<Self>, world: &mut WorldState) -> Vec<Box<dyn Task + Send>>;
}

/// A communication channel between the owner thread and one worker thread.
struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Maximum number of tasks in flight per worker channel.
///
/// Kept at 1 so tasks are processed in order within each channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

/// Manages a pool of worker threads and coordinates task execution.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

impl TaskManager {
    /// Creates a manager with the given number of worker threads.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    let _ = result_tx.send(result);
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Attempts to send a task to a specific worker channel, handing the
    /// task back on failure so it can be requeued.
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds a worker channel that can accept a new task, round-robin from
    /// the last used channel.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        if self
            .channels
            .iter()
            .all(|channel| channel.num_tasks_in_flight >= MAX_TASKS_IN_FLIGHT)
        {
            return None;
        }

        let start_channel = self.current_channel;
        let mut current = start_channel;

        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                info!("All channels are full, but missed the first check");
                return None;
            }
        }
    }

    /// Publishes a task for execution.
    ///
    /// Returns `true` if the task was immediately scheduled on a worker,
    /// `false` if it was queued because all workers are busy.
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        if self.channels.is_empty() {
            self.queued_tasks.push_back(task);
            return false;
        }

        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks onto workers as they become available. Call this
    /// periodically from the owner loop.
    pub fn process_queued_tasks(&mut self) {
        if self.queued_tasks.is_empty() {
            return;
        }

        match self.find_available_channel() {
            None => {} // No available channels, keep tasks queued
            Some(mut channel_idx) => {
                while let Some(task) = self.queued_tasks.pop_front() {
                    match self.try_send_task(task, channel_idx) {
                        Ok(_) => match self.find_available_channel() {
                            Some(next_idx) => channel_idx = next_idx,
                            None => break,
                        },
                        Err(task) => {
                            // Channel is disconnected, put the task back.
                            self.queued_tasks.push_front(task);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Applies all completed task results to the world on the owner thread
    /// and schedules any follow-up tasks they produce.
    pub fn process_completed_tasks(&mut self, world: &mut WorldState) {
        let mut tasks_to_queue = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                let new_tasks = result.handle_result(world);
                for task in new_tasks {
                    tasks_to_queue.push(task);
                }
            }
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }
    }

    /// Returns whether no tasks are queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty()
            && self
                .channels
                .iter()
                .all(|channel| channel.num_tasks_in_flight == 0)
    }
}
