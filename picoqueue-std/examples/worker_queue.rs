//! Worker Queue Example
//!
//! One producer thread feeds fixed-size jobs to two worker threads through a
//! shared bounded queue. Full and empty are handled the intended way: poll,
//! yield, retry.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use picoqueue_std::{Error, QueueConfig, StdQueue};

const JOBS: u32 = 20;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = QueueConfig::new(4, 4).named("jobs");
    let queue = Arc::new(StdQueue::create(&config)?);
    println!(
        "queue created: {} slots of {} bytes",
        queue.capacity()?,
        queue.element_size()
    );

    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            for job in 0..JOBS {
                loop {
                    match queue.put(&job.to_le_bytes()) {
                        Ok(()) => break,
                        Err(Error::QueueFull) => thread::yield_now(),
                        Err(other) => panic!("put failed: {}", other),
                    }
                }
                println!("produced job {}", job);
            }
        })
    };

    let workers: Vec<_> = (0..2)
        .map(|id| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut done = 0u32;
                let mut dest = [0u8; 4];
                loop {
                    match queue.get(&mut dest) {
                        Ok(_) => {
                            let job = u32::from_le_bytes(dest);
                            println!("worker {} took job {}", id, job);
                            thread::sleep(Duration::from_millis(10));
                            done += 1;
                            if done >= JOBS / 2 {
                                break;
                            }
                        }
                        Err(Error::QueueEmpty) => thread::yield_now(),
                        Err(other) => panic!("get failed: {}", other),
                    }
                }
                done
            })
        })
        .collect();

    producer.join().expect("producer panicked");
    let total: u32 = workers
        .into_iter()
        .map(|w| w.join().expect("worker panicked"))
        .sum();

    println!("all {} jobs processed", total);
    Ok(())
}
