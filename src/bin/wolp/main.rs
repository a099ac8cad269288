//! wolp - plays a short phrase on the default output device
//!
//! Run with: cargo run --release

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::LevelFilter;
use rtrb::Producer;
use simple_logger::SimpleLogger;
use wolp::{ParamId, Synth, SynthConfig, SynthMessage, MAX_BLOCK_SIZE};

const CHANNEL: u8 = 0;

/// (notes, velocity, held ms)
const PHRASE: &[(&[u8], u8, u64)] = &[
    (&[48, 55, 64], 90, 600),
    (&[60], 110, 150),
    (&[64], 70, 150),
    (&[67], 100, 150),
    (&[72], 127, 400),
    (&[45, 52, 60], 60, 600),
    (&[57], 80, 150),
    (&[60], 100, 150),
    (&[64], 127, 600),
];

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .wrap_err("failed to install logger")?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    log::info!("output: {} Hz, {} channels", sample_rate, channels);

    let (mut synth, mut tx) = Synth::with_queue(SynthConfig {
        sample_rate,
        ..Default::default()
    })
    .wrap_err("failed to build synth")?;

    let params = synth.params().clone();
    params.set(ParamId::Saw, 0.6);
    params.set(ParamId::Rect, 0.3);
    params.set(ParamId::Tri, 0.1);
    params.set(ParamId::Cutoff, 700.0);
    params.set(ParamId::Velocity, 0.6);
    params.set(ParamId::Release, 0.5);

    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                let block = &mut render_buf[..frames];
                block.fill(0.0);
                synth.render_next_block(block, 0, frames);

                // Mono to every channel
                let out_off = frames_written * channels;
                for (i, &s) in block.iter().enumerate() {
                    let frame = out_off + i * channels;
                    data[frame..frame + channels].fill(s);
                }

                frames_written += frames;
            }
        },
        |err| log::error!("audio stream error: {}", err),
        None,
    )?;
    stream.play().wrap_err("failed to start output stream")?;

    for &(notes, velocity, held_ms) in PHRASE {
        play(&mut tx, notes, velocity, held_ms)?;
        log::info!("cutoff {:.0} Hz", params.get(ParamId::CurCutoff));
    }

    send(&mut tx, SynthMessage::AllNotesOff)?;
    thread::sleep(Duration::from_millis(1_000));
    Ok(())
}

fn play(
    tx: &mut Producer<SynthMessage>,
    notes: &[u8],
    velocity: u8,
    held_ms: u64,
) -> EyreResult<()> {
    for &note in notes {
        send(
            tx,
            SynthMessage::NoteOn {
                channel: CHANNEL,
                note,
                velocity,
            },
        )?;
    }
    thread::sleep(Duration::from_millis(held_ms));
    for &note in notes {
        send(
            tx,
            SynthMessage::NoteOff {
                channel: CHANNEL,
                note,
                velocity: 0,
            },
        )?;
    }
    Ok(())
}

fn send(tx: &mut Producer<SynthMessage>, msg: SynthMessage) -> EyreResult<()> {
    tx.push(msg)
        .map_err(|_| eyre!("note queue is full, dropped {:?}", msg))
}
