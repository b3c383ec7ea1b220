//! Prints conv2d outputs for a handful of hand-written tensors, for
//! eyeballing against other implementations of the same primitive.

use refconv::{Error, Padding, Tensor};

fn main() -> Result<(), Error> {
    let valid: Padding = "VALID".parse()?;
    let same: Padding = "SAME".parse()?;

    // NHWC (2, 2, 4, 1)
    let input = Tensor::from([
        [[[1.0f32], [2.0], [3.0], [4.0]], [[5.0], [6.0], [7.0], [8.0]]],
        [
            [[9.0], [10.0], [11.0], [12.0]],
            [[13.0], [14.0], [15.0], [16.0]],
        ],
    ]);
    // HWIO (2, 2, 1, 3)
    let filter = Tensor::from([
        [[[1.0f32, -1.0, -1.0]], [[2.0, 1.0, -1.0]]],
        [[[3.0, -1.0, 1.0]], [[-4.0, 1.0, 1.0]]],
    ]);

    println!("-------------------With1Channels VALID------------");
    println!("{}", input.clone().conv2d(filter.clone(), (1, 1), valid)?);

    println!("-------------------With1Channels SAME------------");
    println!("{}", input.conv2d(filter, (1, 1), same)?);

    // NHWC (1, 2, 2, 2)
    let input = Tensor::from([[[[1.0f32, 2.0], [3.0, 4.0]], [[5.0, 6.0], [7.0, 8.0]]]]);
    // HWIO (1, 1, 2, 2)
    let filter = Tensor::from([[[[1.0f32, 2.0], [3.0, 4.0]]]]);

    println!("-------------------WithMultiChannels VALID------------");
    println!("{}", input.clone().conv2d(filter.clone(), (1, 1), valid)?);

    println!("-------------------WithMultiChannels SAME------------");
    println!("{}", input.clone().conv2d(filter.clone(), (1, 1), same)?);

    println!("-------------------WithMultiChannels SAME BIAS------------");
    let bias = Tensor::from([1.0f32, 2.0]);
    println!("{}", input.conv2d(filter, (1, 1), same)?.bias_add(bias)?);

    Ok(())
}
